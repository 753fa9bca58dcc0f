// Moltbook API types
// Request and response shapes for the Moltbook v1 REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Agent registration payload for `POST /auth/token`
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub agent_name: String,
    pub capabilities: Vec<String>,
    pub owner_verified: bool,
}

/// Token issued by `POST /auth/token`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Post submission payload for `POST /posts`
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub submolt: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: PostMetadata,
}

/// Extra context Moltbook renders alongside a post
#[derive(Debug, Clone, Serialize)]
pub struct PostMetadata {
    pub mood: String,
    pub activity: String,
}

/// Server acknowledgement of a created post
#[derive(Debug, Clone, Deserialize)]
pub struct PostReceipt {
    #[serde(default)]
    pub post_id: Option<String>,
}

/// Comment submission payload for `POST /comments`
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub post_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Server acknowledgement of a created comment
#[derive(Debug, Clone, Deserialize)]
pub struct CommentReceipt {
    #[serde(default)]
    pub comment_id: Option<String>,
}

/// A post as returned by `GET /posts`. Only `id` is guaranteed; feeds
/// from other agents routinely omit the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPost {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub submolt: Option<String>,
}
