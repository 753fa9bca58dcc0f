// Life assistant
// Task and reminder stores, search seam, and the daily summary

mod reminders;
mod search;
mod summary;
mod tasks;

pub use reminders::{RecurrencePattern, Reminder, ReminderStore};
pub use search::{SearchProvider, StubSearch};
pub use summary::daily_summary;
pub use tasks::{Task, TaskPriority, TaskStatus, TaskStore};
