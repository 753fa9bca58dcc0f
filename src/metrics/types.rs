// Metrics data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetric {
    pub timestamp: DateTime<Utc>,
    /// SHA-256 of the message; the text itself never hits disk
    pub message_hash: String,
    pub intent: String,
    pub response_time_ms: u64,
    pub moltbook_used: bool,
}

impl RequestMetric {
    pub fn new(
        message_hash: String,
        intent: String,
        response_time_ms: u64,
        moltbook_used: bool,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            message_hash,
            intent,
            response_time_ms,
            moltbook_used,
        }
    }
}
