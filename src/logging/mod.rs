// Activity logging
//
// Append-only JSONL record of bot actions (tasks, reminders, social
// activity) so the owner can audit what ran autonomously.

mod activity;

pub use activity::{ActivityLogger, BotEvent, LogEntry};
