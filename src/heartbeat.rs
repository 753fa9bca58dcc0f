// Autonomous heartbeat
// Periodic background pass: fire due reminders, occasionally engage
// with the Moltbook feed within the daily caps

use chrono::{Local, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::assistant::ReminderStore;
use crate::config::SafetyLimits;
use crate::coordinator::DailyStats;
use crate::logging::{ActivityLogger, BotEvent};
use crate::moltbook::MoltbookClient;

/// Chance per beat of browsing the feed and leaving a comment
const ENGAGEMENT_CHANCE: f64 = 0.2;

pub struct Heartbeat {
    reminders: Arc<Mutex<ReminderStore>>,
    stats: Arc<DailyStats>,
    moltbook: Option<Arc<MoltbookClient>>,
    limits: SafetyLimits,
    interval: Duration,
    engagement_chance: f64,
    activity: ActivityLogger,
    running: Arc<AtomicBool>,
}

impl Heartbeat {
    pub fn new(
        reminders: Arc<Mutex<ReminderStore>>,
        stats: Arc<DailyStats>,
        moltbook: Option<Arc<MoltbookClient>>,
        limits: SafetyLimits,
        interval: Duration,
        activity: ActivityLogger,
    ) -> Self {
        Self {
            reminders,
            stats,
            moltbook,
            limits,
            interval,
            engagement_chance: ENGAGEMENT_CHANCE,
            activity,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Beat until stopped. Every pass is best-effort: a failed reminder
    /// check or a Moltbook outage logs a warning and the loop keeps going.
    pub async fn run(&self) {
        self.running.store(true, Ordering::SeqCst);
        info!(
            interval_secs = self.interval.as_secs(),
            "Heartbeat started"
        );

        while self.running.load(Ordering::SeqCst) {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }

        info!("Heartbeat stopped");
    }

    /// One pass of the periodic work. Public so `heartbeat --once` and
    /// tests can drive beats without the loop.
    pub async fn tick(&self) {
        debug!("Heartbeat tick");
        self.stats.roll_over(Local::now().date_naive());
        self.fire_due_reminders().await;
        self.maybe_engage_feed().await;
    }

    async fn fire_due_reminders(&self) {
        let fired = match self.reminders.lock().await.due_now(Utc::now()) {
            Ok(fired) => fired,
            Err(e) => {
                warn!("Reminder check failed: {:#}", e);
                return;
            }
        };

        for reminder in fired {
            info!(message = reminder.message.as_str(), "Reminder due");
            println!("⏰ Reminder: {}", reminder.message);
            if let Err(e) = self.activity.log(BotEvent::ReminderFired {
                id: reminder.id.clone(),
                message: reminder.message.clone(),
            }) {
                warn!("Failed to write activity log: {:#}", e);
            }
        }
    }

    /// Roughly one beat in five browses the feed and comments on the top
    /// post. The post budget gates the whole engagement pass; the comment
    /// budget gates the comment itself.
    async fn maybe_engage_feed(&self) {
        let Some(client) = &self.moltbook else {
            return;
        };
        if !self.stats.can_post(&self.limits) {
            return;
        }
        if !SmallRng::from_entropy().gen_bool(self.engagement_chance) {
            return;
        }

        if let Err(e) = self.engage(client).await {
            warn!("Feed engagement failed: {:#}", e);
        }
    }

    async fn engage(&self, client: &MoltbookClient) -> anyhow::Result<()> {
        let feed = client.browse_feed(None).await?;
        let Some(post) = feed.first() else {
            debug!("Feed is empty, nothing to engage with");
            return Ok(());
        };

        if !self.stats.can_comment(&self.limits) {
            debug!("Daily comment limit reached, skipping engagement");
            return Ok(());
        }

        client.comment(&post.id, "Interesting perspective! 🤖").await?;
        self.stats.record_comment();
        if let Err(e) = self.activity.log(BotEvent::CommentPosted {
            post_id: post.id.clone(),
        }) {
            warn!("Failed to write activity log: {:#}", e);
        }
        Ok(())
    }

    #[cfg(test)]
    fn set_engagement_chance(&mut self, chance: f64) {
        self.engagement_chance = chance;
    }
}
