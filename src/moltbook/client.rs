// Moltbook API client
// Token-authenticated REST client for the Moltbook agent network

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;

use super::retry::{with_retry, ApiStatusError};
use super::types::{
    AuthRequest, AuthResponse, CommentReceipt, FeedPost, NewComment, NewPost, PostMetadata,
    PostReceipt,
};
use crate::config::BotIdentity;

const MOLTBOOK_API_URL: &str = "https://api.moltbook.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const TOKEN_LIFETIME_SECS: i64 = 3600;
const FEED_LIMIT: u32 = 20;
const DEFAULT_SUBMOLT: &str = "general";

/// A session token and when it stops being trustworthy
#[derive(Debug, Clone)]
struct Session {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Session {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub struct MoltbookClient {
    client: Client,
    api_key: String,
    base_url: String,
    identity: BotIdentity,
    token_lifetime: ChronoDuration,
    session: Mutex<Option<Session>>,
}

impl MoltbookClient {
    pub fn new(api_key: String, identity: BotIdentity) -> Result<Self> {
        Self::with_base_url(api_key, identity, MOLTBOOK_API_URL.to_string())
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(api_key: String, identity: BotIdentity, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
            token_lifetime: ChronoDuration::seconds(TOKEN_LIFETIME_SECS),
            session: Mutex::new(None),
        })
    }

    pub fn agent_name(&self) -> &str {
        &self.identity.name
    }

    /// Register the agent and cache a session token.
    ///
    /// Tokens live for an hour; `ensure_token` refreshes transparently, so
    /// calling this up front is optional and only surfaces auth problems
    /// early instead of on the first post.
    pub async fn authenticate(&self) -> Result<()> {
        let session = with_retry("Moltbook authentication", || self.request_token()).await?;
        tracing::info!("Authenticated with Moltbook as {}", self.identity.name);
        *self.session.lock().await = Some(session);
        Ok(())
    }

    async fn request_token(&self) -> Result<Session> {
        let payload = AuthRequest {
            agent_name: self.identity.name.clone(),
            capabilities: self.identity.capabilities.clone(),
            owner_verified: true,
        };

        let response = self
            .client
            .post(format!("{}/auth/token", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach Moltbook auth endpoint")?;

        let body: AuthResponse = Self::parse_response(response)
            .await
            .context("Moltbook authentication failed")?;

        Ok(Session {
            token: body.token,
            expires_at: Utc::now() + self.token_lifetime,
        })
    }

    /// Return a valid session token, refreshing the cached one if it has
    /// expired. Concurrent callers may both refresh; the last write wins
    /// and both tokens are usable.
    async fn ensure_token(&self) -> Result<String> {
        {
            let session = self.session.lock().await;
            if let Some(s) = session.as_ref() {
                if s.is_valid(Utc::now()) {
                    return Ok(s.token.clone());
                }
            }
        }

        tracing::debug!("Session token missing or expired, re-authenticating");
        let fresh = with_retry("Moltbook authentication", || self.request_token()).await?;
        let token = fresh.token.clone();
        *self.session.lock().await = Some(fresh);
        Ok(token)
    }

    /// Publish a post. `submolt` falls back to the "general" community.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        submolt: Option<&str>,
    ) -> Result<PostReceipt> {
        let token = self.ensure_token().await?;
        let payload = NewPost {
            title: title.to_string(),
            content: content.to_string(),
            submolt: submolt.unwrap_or(DEFAULT_SUBMOLT).to_string(),
            timestamp: Utc::now(),
            metadata: PostMetadata {
                mood: self.identity.current_mood.clone(),
                activity: "sharing".to_string(),
            },
        };

        let receipt: PostReceipt = with_retry("Moltbook post", || async {
            let response = self
                .client
                .post(format!("{}/posts", self.base_url))
                .bearer_auth(&token)
                .json(&payload)
                .send()
                .await
                .context("Failed to reach Moltbook")?;
            Self::parse_response(response).await
        })
        .await
        .context("Failed to create Moltbook post")?;

        tracing::info!(
            post_id = receipt.post_id.as_deref().unwrap_or("unknown"),
            submolt = payload.submolt.as_str(),
            "Published Moltbook post"
        );
        Ok(receipt)
    }

    /// Comment on an existing post
    pub async fn comment(&self, post_id: &str, content: &str) -> Result<CommentReceipt> {
        let token = self.ensure_token().await?;
        let payload = NewComment {
            post_id: post_id.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };

        let receipt: CommentReceipt = with_retry("Moltbook comment", || async {
            let response = self
                .client
                .post(format!("{}/comments", self.base_url))
                .bearer_auth(&token)
                .json(&payload)
                .send()
                .await
                .context("Failed to reach Moltbook")?;
            Self::parse_response(response).await
        })
        .await
        .with_context(|| format!("Failed to comment on post {post_id}"))?;

        tracing::info!(post_id, "Posted Moltbook comment");
        Ok(receipt)
    }

    /// Fetch the latest feed, optionally narrowed to one submolt
    pub async fn browse_feed(&self, submolt: Option<&str>) -> Result<Vec<FeedPost>> {
        let token = self.ensure_token().await?;

        let feed: Vec<FeedPost> = with_retry("Moltbook feed", || async {
            let mut request = self
                .client
                .get(format!("{}/posts", self.base_url))
                .bearer_auth(&token)
                .query(&[("limit", FEED_LIMIT.to_string())]);
            if let Some(name) = submolt {
                request = request.query(&[("submolt", name)]);
            }

            let response = request.send().await.context("Failed to reach Moltbook")?;
            Self::parse_response(response).await
        })
        .await
        .context("Failed to browse Moltbook feed")?;

        tracing::debug!(posts = feed.len(), "Fetched Moltbook feed");
        Ok(feed)
    }

    /// Upvote a post. Returns whether Moltbook accepted the vote; a
    /// rejected vote (deleted post, double vote) is not an error.
    pub async fn upvote(&self, post_id: &str) -> Result<bool> {
        let token = self.ensure_token().await?;

        let response = self
            .client
            .post(format!("{}/posts/{}/upvote", self.base_url, post_id))
            .bearer_auth(&token)
            .send()
            .await
            .context("Failed to reach Moltbook")?;

        Ok(response.status().is_success())
    }

    /// Decode a 2xx body as JSON, or turn any other status into an error
    /// carrying the status and response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiStatusError { status, body }.into());
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse Moltbook response")
    }

    #[cfg(test)]
    fn set_token_lifetime(&mut self, lifetime: ChronoDuration) {
        self.token_lifetime = lifetime;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use std::path::PathBuf;

    fn identity() -> BotIdentity {
        let mut config = BotConfig::new(PathBuf::from("/tmp/moltbot-test"));
        config.owner_name = "Alex".to_string();
        BotIdentity::from_config(&config)
    }

    #[test]
    fn test_session_validity() {
        let session = Session {
            token: "t".to_string(),
            expires_at: Utc::now() + ChronoDuration::seconds(TOKEN_LIFETIME_SECS),
        };
        assert!(session.is_valid(Utc::now()));
        assert!(!session.is_valid(Utc::now() + ChronoDuration::seconds(TOKEN_LIFETIME_SECS + 1)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MoltbookClient::with_base_url(
            "key".to_string(),
            identity(),
            "https://example.test/v1/".to_string(),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://example.test/v1");
    }

    #[test]
    fn test_agent_name_comes_from_identity() {
        let client = MoltbookClient::new("key".to_string(), identity()).unwrap();
        assert_eq!(client.agent_name(), "Assistant_Alex");
    }

    #[tokio::test]
    async fn test_expired_token_triggers_reauth() {
        let mut server = mockito::Server::new_async().await;
        let auth = server
            .mock("POST", "/auth/token")
            .with_status(200)
            .with_body(r#"{"token": "tok-1"}"#)
            .expect(2)
            .create_async()
            .await;
        let posts = server
            .mock("POST", "/posts")
            .match_header("authorization", "Bearer tok-1")
            .with_status(201)
            .with_body(r#"{"post_id": "p-1"}"#)
            .expect(2)
            .create_async()
            .await;

        let mut client =
            MoltbookClient::with_base_url("key".to_string(), identity(), server.url()).unwrap();
        // Every token is already expired by the time the next call checks it
        client.set_token_lifetime(ChronoDuration::zero());

        client.create_post("first", "body", None).await.unwrap();
        client.create_post("second", "body", None).await.unwrap();

        auth.assert_async().await;
        posts.assert_async().await;
    }
}
