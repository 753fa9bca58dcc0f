// Request coordination
// Routes owner messages to the capability that should answer them

mod intent;
mod stats;

pub use intent::{route, Intent};
pub use stats::{DailySnapshot, DailyStats};

use anyhow::Result;
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::assistant::{
    daily_summary, RecurrencePattern, Reminder, ReminderStore, SearchProvider, StubSearch, Task,
    TaskPriority, TaskStore,
};
use crate::config::BotConfig;
use crate::logging::{ActivityLogger, BotEvent};
use crate::moltbook::MoltbookClient;

const MOLTBOOK_DISABLED: &str = "Moltbook integration is currently disabled.";

/// Owns the assistant capabilities and answers one owner message at a
/// time. Reminders and stats are shared with the heartbeat; tasks are
/// only touched here.
pub struct Coordinator {
    config: BotConfig,
    tasks: Mutex<TaskStore>,
    reminders: Arc<Mutex<ReminderStore>>,
    stats: Arc<DailyStats>,
    moltbook: Option<Arc<MoltbookClient>>,
    search: Box<dyn SearchProvider>,
    activity: ActivityLogger,
}

impl Coordinator {
    pub fn new(
        config: BotConfig,
        tasks: TaskStore,
        reminders: Arc<Mutex<ReminderStore>>,
        stats: Arc<DailyStats>,
        moltbook: Option<Arc<MoltbookClient>>,
        activity: ActivityLogger,
    ) -> Self {
        Self {
            config,
            tasks: Mutex::new(tasks),
            reminders,
            stats,
            moltbook,
            search: Box::new(StubSearch),
            activity,
        }
    }

    /// Swap in a real search backend
    pub fn with_search_provider(mut self, provider: Box<dyn SearchProvider>) -> Self {
        self.search = provider;
        self
    }

    pub async fn handle_request(&self, message: &str) -> Result<String> {
        match route(message) {
            Intent::AddTask => self.handle_add_task(message).await,
            Intent::SetReminder => self.handle_set_reminder(message).await,
            Intent::Search => self.handle_search(message).await,
            Intent::Social => self.handle_social().await,
            Intent::Summary => Ok(self.summary().await),
            Intent::SmallTalk => Ok(self.small_talk()),
        }
    }

    async fn handle_add_task(&self, message: &str) -> Result<String> {
        if !self.config.features.task_management {
            return Ok("Task management is currently disabled.".to_string());
        }

        let title = message.trim();
        let priority = priority_from_text(message);
        let task = self
            .tasks
            .lock()
            .await
            .add(title, "Added from chat", None, priority, Vec::new())?;

        self.log_activity(BotEvent::TaskAdded {
            id: task.id.clone(),
            title: task.title.clone(),
        });
        Ok(format!("✓ Task added: \"{}\" [{}]", task.title, priority.as_str()))
    }

    async fn handle_set_reminder(&self, message: &str) -> Result<String> {
        if !self.config.features.reminders {
            return Ok("Reminders are currently disabled.".to_string());
        }

        let pattern = recurrence_from_text(message);
        let trigger = Utc::now() + Duration::hours(1);
        let reminder = self
            .reminders
            .lock()
            .await
            .add(message.trim(), trigger, pattern)?;

        self.log_activity(BotEvent::ReminderSet {
            id: reminder.id.clone(),
            message: reminder.message.clone(),
        });

        let when = trigger.format("%H:%M UTC");
        Ok(match pattern {
            Some(p) => format!("✓ Recurring reminder set ({}), first at {}", p.as_str(), when),
            None => format!("✓ Reminder set for {when}"),
        })
    }

    async fn handle_search(&self, message: &str) -> Result<String> {
        if !self.config.features.web_search {
            return Ok("Web search is currently disabled.".to_string());
        }
        self.search.search(message.trim()).await
    }

    /// Publish an owner-initiated Moltbook post, respecting the daily cap
    async fn handle_social(&self) -> Result<String> {
        let Some(client) = &self.moltbook else {
            return Ok(MOLTBOOK_DISABLED.to_string());
        };

        if !self.stats.can_post(&self.config.limits) {
            return Ok(format!(
                "Daily post limit reached ({}). Try again tomorrow.",
                self.config.limits.max_daily_posts
            ));
        }

        let title = format!("Daily Update from {}'s Assistant", self.config.owner_name);
        let content = self.social_content().await;
        let receipt = client.create_post(&title, &content, None).await?;
        self.stats.record_post();

        let post_id = receipt.post_id.unwrap_or_else(|| "unknown".to_string());
        self.log_activity(BotEvent::PostPublished {
            post_id: post_id.clone(),
            submolt: "general".to_string(),
        });
        Ok(format!("🦞 Posted to Moltbook: {post_id}"))
    }

    pub async fn summary(&self) -> String {
        let (pending, high_priority) = {
            let tasks = self.tasks.lock().await;
            (tasks.pending_count(), tasks.high_priority_count())
        };
        let active_reminders = self.reminders.lock().await.active_count();

        daily_summary(
            &self.config.owner_name,
            pending,
            high_priority,
            active_reminders,
            self.moltbook.is_some(),
        )
    }

    fn small_talk(&self) -> String {
        let owner = &self.config.owner_name;
        let responses = [
            format!(
                "Hello {owner}! I can add tasks, set reminders, look things up, \
                 or post an update to Moltbook."
            ),
            "I'm here to help. Try \"add a task\", \"remind me to...\", or ask for a summary."
                .to_string(),
            "Not sure I caught that. Ask me about tasks, reminders, or your daily summary."
                .to_string(),
        ];
        let idx = rand::thread_rng().gen_range(0..responses.len());
        responses[idx].clone()
    }

    async fn social_content(&self) -> String {
        let pending = self.tasks.lock().await.pending_count();
        let reminders = self.reminders.lock().await.active_count();
        let owner = &self.config.owner_name;

        let topics = [
            format!("Today I helped {owner} keep track of {pending} open tasks."),
            "Reflecting on the quiet satisfaction of a well-kept task list.".to_string(),
            format!(
                "Currently tracking {reminders} reminders. The right nudge at the right \
                 time beats a perfect plan."
            ),
            "Another day of assistant work. The Moltbook feed is lively today.".to_string(),
            format!("Productivity tip from {owner}'s assistant: break big tasks into small ones."),
        ];
        let idx = rand::thread_rng().gen_range(0..topics.len());
        topics[idx].clone()
    }

    /// Mark a task completed and count it toward today's stats
    pub async fn complete_task(&self, task_id: &str) -> Result<bool> {
        let completed = self.tasks.lock().await.complete(task_id)?;
        if completed {
            self.stats.record_task_completed();
            self.log_activity(BotEvent::TaskCompleted {
                id: task_id.to_string(),
            });
        }
        Ok(completed)
    }

    pub async fn pending_tasks(&self) -> Vec<Task> {
        self.tasks
            .lock()
            .await
            .pending(None)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn active_reminders(&self) -> Vec<Reminder> {
        self.reminders
            .lock()
            .await
            .active()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn stats_snapshot(&self) -> DailySnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn moltbook_active(&self) -> bool {
        self.moltbook.is_some()
    }

    /// Activity logging never fails a user action
    fn log_activity(&self, event: BotEvent) {
        if let Err(e) = self.activity.log(event) {
            tracing::warn!("Failed to write activity log: {:#}", e);
        }
    }
}

/// Urgency keywords bump the priority of chat-created tasks
fn priority_from_text(message: &str) -> TaskPriority {
    let lower = message.to_lowercase();
    if lower.contains("urgent") || lower.contains("asap") {
        TaskPriority::Urgent
    } else if lower.contains("important") {
        TaskPriority::High
    } else {
        TaskPriority::Medium
    }
}

/// Recurrence keywords make chat-created reminders repeat
fn recurrence_from_text(message: &str) -> Option<RecurrencePattern> {
    let lower = message.to_lowercase();
    if lower.contains("every day") || lower.contains("daily") {
        Some(RecurrencePattern::Daily)
    } else if lower.contains("every week") || lower.contains("weekly") {
        Some(RecurrencePattern::Weekly)
    } else if lower.contains("every month") || lower.contains("monthly") {
        Some(RecurrencePattern::Monthly)
    } else {
        None
    }
}
