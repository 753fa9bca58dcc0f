// Moltbook integration
// Client, wire types and retry policy for the Moltbook agent network

mod client;
mod retry;
mod types;

pub use client::MoltbookClient;
pub use retry::{with_retry, ApiStatusError};
pub use types::{
    AuthRequest, AuthResponse, CommentReceipt, FeedPost, NewComment, NewPost, PostMetadata,
    PostReceipt,
};
