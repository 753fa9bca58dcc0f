// Retry logic with exponential backoff
// Transient failures (network, 5xx) retry; client errors fail fast

use anyhow::Result;
use std::fmt;
use std::future::Future;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 1000;

/// Non-2xx response from the Moltbook API, with the body kept for context
#[derive(Debug)]
pub struct ApiStatusError {
    pub status: reqwest::StatusCode,
    pub body: String,
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moltbook API error {}: {}", self.status, self.body)
    }
}

impl std::error::Error for ApiStatusError {}

/// Execute an operation with retry and exponential backoff.
///
/// Retries up to 3 times with doubling delays (1s, 2s). Only transient
/// failures retry; a 4xx from the API means the request itself is wrong
/// and repeating it would give the same answer.
pub async fn with_retry<F, Fut, T>(operation: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable(&e) {
                    return Err(e);
                }

                tracing::warn!(
                    "{} failed (attempt {}/{}): {:#}",
                    operation,
                    attempt + 1,
                    MAX_RETRIES,
                    e
                );
                last_error = Some(e);

                if attempt < MAX_RETRIES - 1 {
                    let delay =
                        Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                    tracing::debug!("Retrying {} in {:?}", operation, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap())
}

/// Timeouts, connection failures and server-side 5xx are worth retrying
fn is_retryable(error: &anyhow::Error) -> bool {
    if let Some(api) = error.downcast_ref::<ApiStatusError>() {
        return api.status.is_server_error();
    }

    error.chain().any(|cause| {
        cause
            .downcast_ref::<reqwest::Error>()
            .map(|e| e.is_timeout() || e.is_connect())
            .unwrap_or(false)
    })
}
