// Metrics logger

use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::types::RequestMetric;

pub struct MetricsLogger {
    metrics_dir: PathBuf,
}

impl MetricsLogger {
    pub fn new(metrics_dir: PathBuf) -> Result<Self> {
        // Create metrics directory if it doesn't exist
        fs::create_dir_all(&metrics_dir).with_context(|| {
            format!(
                "Failed to create metrics directory: {}",
                metrics_dir.display()
            )
        })?;

        Ok(Self { metrics_dir })
    }

    /// Log a request metric to today's JSONL file
    pub fn log(&self, metric: &RequestMetric) -> Result<()> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let log_file = self.metrics_dir.join(format!("{}.jsonl", today));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open metrics log: {}", log_file.display()))?;

        let json = serde_json::to_string(metric).context("Failed to serialize metric")?;

        writeln!(file, "{}", json).context("Failed to write metric to log")?;

        Ok(())
    }

    /// Hash a message for privacy (SHA256)
    pub fn hash_message(message: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(message.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Read metrics for a specific date (YYYY-MM-DD)
    pub fn read_metrics(&self, date: &str) -> Result<Vec<RequestMetric>> {
        let log_file = self.metrics_dir.join(format!("{}.jsonl", date));

        if !log_file.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&log_file)
            .with_context(|| format!("Failed to read metrics log: {}", log_file.display()))?;

        let metrics: Vec<RequestMetric> = contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to parse metrics")?;

        Ok(metrics)
    }

    /// Get summary statistics for today
    pub fn get_today_summary(&self) -> Result<MetricsSummary> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let metrics = self.read_metrics(&today)?;

        let total = metrics.len();
        let moltbook_count = metrics.iter().filter(|m| m.moltbook_used).count();

        let avg_response_time = if total > 0 {
            metrics.iter().map(|m| m.response_time_ms).sum::<u64>() / total as u64
        } else {
            0
        };

        // Count requests per intent
        let mut intent_counts: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();
        for metric in &metrics {
            *intent_counts.entry(metric.intent.clone()).or_insert(0) += 1;
        }

        let mut by_intent: Vec<(String, usize)> = intent_counts.into_iter().collect();
        by_intent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(MetricsSummary {
            total,
            moltbook_count,
            avg_response_time,
            by_intent,
        })
    }
}

#[derive(Debug)]
pub struct MetricsSummary {
    pub total: usize,
    pub moltbook_count: usize,
    pub avg_response_time: u64,
    pub by_intent: Vec<(String, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_message() {
        let hash1 = MetricsLogger::hash_message("Hello");
        let hash2 = MetricsLogger::hash_message("Hello");
        let hash3 = MetricsLogger::hash_message("World");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64); // SHA256 produces 64 hex chars
    }

    #[test]
    fn test_log_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_path_buf()).unwrap();

        logger
            .log(&RequestMetric::new(
                MetricsLogger::hash_message("add a task"),
                "add_task".to_string(),
                12,
                false,
            ))
            .unwrap();
        logger
            .log(&RequestMetric::new(
                MetricsLogger::hash_message("post it"),
                "social".to_string(),
                340,
                true,
            ))
            .unwrap();

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let metrics = logger.read_metrics(&today).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].intent, "add_task");
        assert!(metrics[1].moltbook_used);
    }

    #[test]
    fn test_today_summary() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_path_buf()).unwrap();

        for (intent, ms, social) in [
            ("add_task", 10, false),
            ("add_task", 20, false),
            ("social", 300, true),
        ] {
            logger
                .log(&RequestMetric::new(
                    MetricsLogger::hash_message("x"),
                    intent.to_string(),
                    ms,
                    social,
                ))
                .unwrap();
        }

        let summary = logger.get_today_summary().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.moltbook_count, 1);
        assert_eq!(summary.avg_response_time, 110);
        assert_eq!(summary.by_intent[0], ("add_task".to_string(), 2));
    }

    #[test]
    fn test_read_missing_date() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_path_buf()).unwrap();
        assert!(logger.read_metrics("1999-01-01").unwrap().is_empty());
    }
}
