// Activity log
// Append-only JSONL record of what the bot did on its owner's behalf

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Something the bot did that the owner may want to audit later
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BotEvent {
    TaskAdded { id: String, title: String },
    TaskCompleted { id: String },
    ReminderSet { id: String, message: String },
    ReminderFired { id: String, message: String },
    PostPublished { post_id: String, submolt: String },
    CommentPosted { post_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub event: BotEvent,
}

/// One JSONL file per day: `<data_dir>/bot_YYYY-MM-DD.jsonl`
#[derive(Clone)]
pub struct ActivityLogger {
    data_dir: PathBuf,
}

impl ActivityLogger {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    pub fn log(&self, event: BotEvent) -> Result<()> {
        let entry = LogEntry {
            ts: Utc::now(),
            event,
        };
        let line = serde_json::to_string(&entry).context("Failed to serialize log entry")?;

        let path = self.path_for(Local::now().date_naive());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writeln!(file, "{line}").with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Entries for one day, oldest first. Unparseable lines are skipped
    /// rather than poisoning the whole read.
    pub fn read_entries(&self, date: NaiveDate) -> Result<Vec<LogEntry>> {
        let path = self.path_for(date);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(contents
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(format!("bot_{}.jsonl", date.format("%Y-%m-%d")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_appends_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::new(dir.path().to_path_buf()).unwrap();

        logger
            .log(BotEvent::TaskAdded {
                id: "t-1".to_string(),
                title: "water plants".to_string(),
            })
            .unwrap();
        logger
            .log(BotEvent::TaskCompleted {
                id: "t-1".to_string(),
            })
            .unwrap();

        let today = Local::now().date_naive();
        let entries = logger.read_entries(today).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].event,
            BotEvent::TaskAdded {
                id: "t-1".to_string(),
                title: "water plants".to_string(),
            }
        );
    }

    #[test]
    fn test_event_tag_is_snake_case() {
        let json = serde_json::to_string(&BotEvent::PostPublished {
            post_id: "p-9".to_string(),
            submolt: "general".to_string(),
        })
        .unwrap();
        assert!(json.contains(r#""event":"post_published""#));
        assert!(json.contains(r#""post_id":"p-9""#));
    }

    #[test]
    fn test_read_missing_day_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::new(dir.path().to_path_buf()).unwrap();
        let entries = logger
            .read_entries(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_garbage_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::new(dir.path().to_path_buf()).unwrap();
        logger
            .log(BotEvent::CommentPosted {
                post_id: "p-1".to_string(),
            })
            .unwrap();

        let today = Local::now().date_naive();
        let path = dir.path().join(format!("bot_{}.jsonl", today.format("%Y-%m-%d")));
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ truncated").unwrap();

        let entries = logger.read_entries(today).unwrap();
        assert_eq!(entries.len(), 1);
    }
}
