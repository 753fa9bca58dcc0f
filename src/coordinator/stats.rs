// Daily activity counters
// Tracks social output against per-day caps, resetting at midnight

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use crate::config::SafetyLimits;

/// Point-in-time view of today's counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub posts_made: u64,
    pub comments_made: u64,
    pub tasks_completed: u64,
}

/// Lock-free counters shared between the chat path and the heartbeat.
///
/// The date is stored as days-since-CE so rollover is a single
/// compare-exchange; whichever caller notices the new day first resets
/// the counters.
pub struct DailyStats {
    date_days: AtomicI64,
    posts_made: AtomicU64,
    comments_made: AtomicU64,
    tasks_completed: AtomicU64,
    path: Option<PathBuf>,
}

fn date_to_days(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64
}

fn days_to_date(days: i64) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(days as i32).unwrap_or_default()
}

impl DailyStats {
    /// In-memory counters with no persistence
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date_days: AtomicI64::new(date_to_days(today)),
            posts_made: AtomicU64::new(0),
            comments_made: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            path: None,
        }
    }

    /// Restore counters from `path` when they belong to `today`; a stale
    /// or unreadable file starts the day at zero. Never fails: stats are
    /// not worth refusing to start over.
    pub fn load(path: PathBuf, today: NaiveDate) -> Self {
        let mut stats = Self::new(today);

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<DailySnapshot>(&contents) {
                Ok(snapshot) if snapshot.date == today => {
                    stats.posts_made = AtomicU64::new(snapshot.posts_made);
                    stats.comments_made = AtomicU64::new(snapshot.comments_made);
                    stats.tasks_completed = AtomicU64::new(snapshot.tasks_completed);
                }
                Ok(snapshot) => {
                    tracing::debug!(
                        "Stats file is for {}, starting fresh counters for {}",
                        snapshot.date,
                        today
                    );
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable stats file {}: {}", path.display(), e);
                }
            },
            Err(_) => {} // no stats yet
        }

        stats.path = Some(path);
        stats
    }

    /// Reset the counters when the calendar day changes. Safe to call on
    /// every heartbeat; off-day calls are a cheap load-and-compare.
    pub fn roll_over(&self, today: NaiveDate) {
        let today_days = date_to_days(today);
        let current = self.date_days.load(Ordering::SeqCst);
        if current == today_days {
            return;
        }

        if self
            .date_days
            .compare_exchange(current, today_days, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.posts_made.store(0, Ordering::SeqCst);
            self.comments_made.store(0, Ordering::SeqCst);
            self.tasks_completed.store(0, Ordering::SeqCst);
            tracing::info!("Daily stats reset for {}", today);
            self.persist_best_effort();
        }
    }

    pub fn record_post(&self) {
        self.posts_made.fetch_add(1, Ordering::SeqCst);
        self.persist_best_effort();
    }

    pub fn record_comment(&self) {
        self.comments_made.fetch_add(1, Ordering::SeqCst);
        self.persist_best_effort();
    }

    pub fn record_task_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::SeqCst);
        self.persist_best_effort();
    }

    pub fn can_post(&self, limits: &SafetyLimits) -> bool {
        self.posts_made.load(Ordering::SeqCst) < limits.max_daily_posts
    }

    pub fn can_comment(&self, limits: &SafetyLimits) -> bool {
        self.comments_made.load(Ordering::SeqCst) < limits.max_daily_comments
    }

    pub fn snapshot(&self) -> DailySnapshot {
        DailySnapshot {
            date: days_to_date(self.date_days.load(Ordering::SeqCst)),
            posts_made: self.posts_made.load(Ordering::SeqCst),
            comments_made: self.comments_made.load(Ordering::SeqCst),
            tasks_completed: self.tasks_completed.load(Ordering::SeqCst),
        }
    }

    fn persist_best_effort(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let result = (|| -> anyhow::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&self.snapshot())?;
            fs::write(path, json)?;
            Ok(())
        })();

        if let Err(e) = result {
            tracing::warn!("Failed to persist daily stats: {:#}", e);
        }
    }
}
