// Search provider seam
// The bot ships with a canned provider; a real backend implements the trait

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<String>;
}

/// Placeholder provider returning canned results with simulated latency
pub struct StubSearch;

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(format!(
            "[Search results for: {query}]\n\
             Found 3 relevant articles. This is a stub result; connect a \
             real search backend to get live data."
        ))
    }
}
