// Slash command handling

use anyhow::Result;

use crate::assistant::{Reminder, Task};
use crate::bot::Moltbot;

pub enum Command {
    Help,
    Quit,
    Summary,
    Tasks,
    Reminders,
    Done(String),
    Stats,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        match head {
            "/help" => Some(Command::Help),
            "/quit" | "/exit" => Some(Command::Quit),
            "/summary" => Some(Command::Summary),
            "/tasks" => Some(Command::Tasks),
            "/reminders" => Some(Command::Reminders),
            "/done" => Some(Command::Done(rest.to_string())),
            "/stats" => Some(Command::Stats),
            _ => None,
        }
    }
}

pub async fn handle_command(command: Command, bot: &Moltbot) -> Result<String> {
    match command {
        Command::Help => Ok(format_help()),
        Command::Quit => Ok("Goodbye!".to_string()),
        Command::Summary => Ok(bot.coordinator().summary().await),
        Command::Tasks => Ok(format_tasks(&bot.coordinator().pending_tasks().await)),
        Command::Reminders => Ok(format_reminders(
            &bot.coordinator().active_reminders().await,
        )),
        Command::Done(id) => handle_done(bot, &id).await,
        Command::Stats => format_stats(bot),
    }
}

fn format_help() -> String {
    r#"Available commands:
  /help       - Show this help message
  /quit       - Exit the chat
  /summary    - Daily summary
  /tasks      - List pending tasks with their ids
  /reminders  - List active reminders
  /done <id>  - Mark a task completed (id prefix is enough)
  /stats      - Today's activity and request stats

Anything else is treated as a message to the bot."#
        .to_string()
}

fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No pending tasks.".to_string();
    }

    let mut output = String::from("Pending tasks:\n");
    for task in tasks {
        let short_id = &task.id[..8.min(task.id.len())];
        let due = task
            .due_date
            .map(|d| format!(", due {}", d.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();
        output.push_str(&format!(
            "  [{}] {} ({}{})\n",
            short_id,
            task.title,
            task.priority.as_str(),
            due
        ));
    }
    output
}

fn format_reminders(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No active reminders.".to_string();
    }

    let mut output = String::from("Active reminders:\n");
    for reminder in reminders {
        let recurrence = reminder
            .recurrence_pattern
            .map(|p| format!(", {}", p.as_str()))
            .unwrap_or_default();
        output.push_str(&format!(
            "  {} at {}{}\n",
            reminder.message,
            reminder.trigger_time.format("%Y-%m-%d %H:%M UTC"),
            recurrence
        ));
    }
    output
}

/// Complete a task by id or unique id prefix, as shown by /tasks
async fn handle_done(bot: &Moltbot, id: &str) -> Result<String> {
    if id.is_empty() {
        return Ok("Usage: /done <task-id>".to_string());
    }

    let pending = bot.coordinator().pending_tasks().await;
    let matches: Vec<&Task> = pending.iter().filter(|t| t.id.starts_with(id)).collect();

    match matches.len() {
        0 => Ok(format!("No open task matches \"{id}\"")),
        1 => {
            let task = matches[0];
            bot.coordinator().complete_task(&task.id).await?;
            Ok(format!("✓ Completed: {}", task.title))
        }
        n => Ok(format!("\"{id}\" matches {n} tasks; use more characters")),
    }
}

fn format_stats(bot: &Moltbot) -> Result<String> {
    let snapshot = bot.coordinator().stats_snapshot();
    let limits = &bot.config().limits;
    let summary = bot.metrics().get_today_summary()?;

    let mut output = format!(
        "Today ({}):\n\
        Posts: {}/{}\n\
        Comments: {}/{}\n\
        Tasks completed: {}\n\
        Requests handled: {} (avg {}ms, {} via Moltbook)\n",
        snapshot.date,
        snapshot.posts_made,
        limits.max_daily_posts,
        snapshot.comments_made,
        limits.max_daily_comments,
        snapshot.tasks_completed,
        summary.total,
        summary.avg_response_time,
        summary.moltbook_count
    );

    if !summary.by_intent.is_empty() {
        output.push_str("\nBy intent:\n");
        for (i, (intent, count)) in summary.by_intent.iter().enumerate() {
            output.push_str(&format!("  {}. {} ({})\n", i + 1, intent, count));
        }
    }

    Ok(output)
}
