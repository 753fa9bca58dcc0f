// Reminder store
// One-shot and recurring reminders persisted as TOML

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    /// Next trigger after a firing. Monthly is a 30-day approximation;
    /// calendar-exact months are not worth the edge cases here.
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            RecurrencePattern::Daily => from + Duration::days(1),
            RecurrencePattern::Weekly => from + Duration::weeks(1),
            RecurrencePattern::Monthly => from + Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub message: String,
    pub trigger_time: DateTime<Utc>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default)]
    pub triggered: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ReminderFile {
    #[serde(default)]
    reminders: Vec<Reminder>,
}

/// Reminders live in `<data_dir>/reminders.toml`.
///
/// Fired reminders stay in the file marked `triggered` so there is a
/// record of what fired; a recurring reminder gets a fresh successor
/// entry for its next occurrence instead of being rescheduled in place.
pub struct ReminderStore {
    path: PathBuf,
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    pub fn load(path: PathBuf) -> Result<Self> {
        let reminders = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file: ReminderFile = toml::from_str(&contents)
                .with_context(|| format!("Invalid reminder file {}", path.display()))?;
            file.reminders
        } else {
            Vec::new()
        };

        Ok(Self { path, reminders })
    }

    pub fn add(
        &mut self,
        message: &str,
        trigger_time: DateTime<Utc>,
        pattern: Option<RecurrencePattern>,
    ) -> Result<Reminder> {
        let reminder = Reminder {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.to_string(),
            trigger_time,
            recurring: pattern.is_some(),
            recurrence_pattern: pattern,
            triggered: false,
        };

        self.reminders.push(reminder.clone());
        self.save()?;
        tracing::info!(
            reminder_id = reminder.id.as_str(),
            trigger = %trigger_time,
            recurring = reminder.recurring,
            "Reminder set"
        );
        Ok(reminder)
    }

    /// Fire everything due at `now`: each due reminder is marked
    /// triggered and returned, and recurring ones enqueue a successor.
    /// Calling again with the same clock returns nothing.
    pub fn due_now(&mut self, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let mut fired = Vec::new();
        let mut successors = Vec::new();

        for reminder in &mut self.reminders {
            if reminder.triggered || reminder.trigger_time > now {
                continue;
            }

            reminder.triggered = true;
            if reminder.recurring {
                if let Some(pattern) = reminder.recurrence_pattern {
                    successors.push(Reminder {
                        id: uuid::Uuid::new_v4().to_string(),
                        message: reminder.message.clone(),
                        trigger_time: pattern.next_occurrence(reminder.trigger_time),
                        recurring: true,
                        recurrence_pattern: Some(pattern),
                        triggered: false,
                    });
                }
            }
            fired.push(reminder.clone());
        }

        if !fired.is_empty() {
            self.reminders.extend(successors);
            self.save()?;
        }
        Ok(fired)
    }

    /// Reminders still waiting to fire
    pub fn active_count(&self) -> usize {
        self.reminders.iter().filter(|r| !r.triggered).count()
    }

    pub fn active(&self) -> Vec<&Reminder> {
        let mut active: Vec<&Reminder> =
            self.reminders.iter().filter(|r| !r.triggered).collect();
        active.sort_by_key(|r| r.trigger_time);
        active
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = ReminderFile {
            reminders: self.reminders.clone(),
        };
        let toml_string =
            toml::to_string_pretty(&file).context("Failed to serialize reminders")?;
        fs::write(&self.path, toml_string)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ReminderStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ReminderStore::load(dir.path().join("reminders.toml")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let (_dir, mut store) = store();
        let now = Utc::now();
        store
            .add("stretch", now - Duration::minutes(1), None)
            .unwrap();

        let fired = store.due_now(now).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].message, "stretch");
        assert!(fired[0].triggered);

        // Same clock, nothing more to fire
        assert!(store.due_now(now).unwrap().is_empty());
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_future_reminder_not_fired() {
        let (_dir, mut store) = store();
        let now = Utc::now();
        store.add("later", now + Duration::hours(2), None).unwrap();

        assert!(store.due_now(now).unwrap().is_empty());
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_recurring_enqueues_successor() {
        let (_dir, mut store) = store();
        let now = Utc::now();
        let trigger = now - Duration::minutes(5);
        store
            .add("standup", trigger, Some(RecurrencePattern::Daily))
            .unwrap();

        let fired = store.due_now(now).unwrap();
        assert_eq!(fired.len(), 1);

        // One active successor, scheduled a day after the original trigger
        assert_eq!(store.active_count(), 1);
        let next = store.active()[0];
        assert_eq!(next.message, "standup");
        assert_eq!(next.trigger_time, trigger + Duration::days(1));
        assert!(next.recurring);
        assert_ne!(next.id, fired[0].id);
    }

    #[test]
    fn test_weekly_and_monthly_offsets() {
        let now = Utc::now();
        assert_eq!(
            RecurrencePattern::Weekly.next_occurrence(now),
            now + Duration::days(7)
        );
        assert_eq!(
            RecurrencePattern::Monthly.next_occurrence(now),
            now + Duration::days(30)
        );
    }

    #[test]
    fn test_persistence_roundtrip() {
        let (dir, mut store) = store();
        let now = Utc::now();
        store
            .add("water plants", now + Duration::hours(1), Some(RecurrencePattern::Weekly))
            .unwrap();

        let reloaded = ReminderStore::load(dir.path().join("reminders.toml")).unwrap();
        assert_eq!(reloaded.active_count(), 1);
        let r = reloaded.active()[0];
        assert_eq!(r.message, "water plants");
        assert_eq!(r.recurrence_pattern, Some(RecurrencePattern::Weekly));
    }

    #[test]
    fn test_fired_state_persists() {
        let (dir, mut store) = store();
        let now = Utc::now();
        store.add("once", now - Duration::minutes(1), None).unwrap();
        store.due_now(now).unwrap();

        // A reload must not resurrect the fired reminder
        let mut reloaded = ReminderStore::load(dir.path().join("reminders.toml")).unwrap();
        assert!(reloaded.due_now(now).unwrap().is_empty());
        assert_eq!(reloaded.active_count(), 0);
    }

    #[test]
    fn test_active_sorted_by_trigger_time() {
        let (_dir, mut store) = store();
        let now = Utc::now();
        store.add("second", now + Duration::hours(2), None).unwrap();
        store.add("first", now + Duration::hours(1), None).unwrap();

        let active = store.active();
        assert_eq!(active[0].message, "first");
        assert_eq!(active[1].message, "second");
    }
}
