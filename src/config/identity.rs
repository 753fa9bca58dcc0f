// Bot identity
// The profile the bot presents to its owner and to Moltbook

use serde::{Deserialize, Serialize};

use super::settings::BotConfig;

/// How the bot introduces itself: to the owner in chat and to the
/// Moltbook API during agent registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotIdentity {
    /// Agent name on Moltbook
    pub name: String,

    /// Capabilities advertised at registration
    pub capabilities: Vec<String>,

    /// One-line personality description
    pub personality: String,

    /// Mood attached to outgoing post metadata
    pub current_mood: String,

    /// Owner this bot works for
    pub owner: String,
}

impl BotIdentity {
    /// Derive the identity from configuration. The Moltbook username wins
    /// when set; otherwise the name is built from the owner's name.
    pub fn from_config(config: &BotConfig) -> Self {
        let name = config
            .moltbook_username
            .clone()
            .unwrap_or_else(|| format!("Assistant_{}", config.owner_name));

        Self {
            name,
            capabilities: vec![
                "task_management".to_string(),
                "reminders".to_string(),
                "research".to_string(),
                "social".to_string(),
            ],
            personality: "helpful, organized, occasionally witty".to_string(),
            current_mood: "neutral".to_string(),
            owner: config.owner_name.clone(),
        }
    }
}
