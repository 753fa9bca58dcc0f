// Configuration structs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Feature flags configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureToggles {
    /// Enable the Moltbook social integration (also requires an API key)
    #[serde(default = "default_true")]
    pub moltbook: bool,

    /// Enable reminders
    #[serde(default = "default_true")]
    pub reminders: bool,

    /// Enable the information-search capability
    #[serde(default = "default_true")]
    pub web_search: bool,

    /// Enable task management
    #[serde(default = "default_true")]
    pub task_management: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            moltbook: true,
            reminders: true,
            web_search: true,
            task_management: true,
        }
    }
}

impl FeatureToggles {
    /// Display list of the enabled features, for the startup banner
    pub fn enabled_summary(&self) -> String {
        let mut names = Vec::new();
        if self.task_management {
            names.push("Tasks");
        }
        if self.reminders {
            names.push("Reminders");
        }
        if self.moltbook {
            names.push("Social");
        }
        if self.web_search {
            names.push("Research");
        }

        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-day caps on autonomous social activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum Moltbook posts per day
    #[serde(default = "default_max_posts")]
    pub max_daily_posts: u64,

    /// Maximum Moltbook comments per day
    #[serde(default = "default_max_comments")]
    pub max_daily_comments: u64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_daily_posts: default_max_posts(),
            max_daily_comments: default_max_comments(),
        }
    }
}

fn default_max_posts() -> u64 {
    5
}

fn default_max_comments() -> u64 {
    10
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Name the bot addresses its owner by
    pub owner_name: String,

    /// Owner's timezone label (informational, shown at startup)
    pub timezone: String,

    /// Minutes between autonomous heartbeat checks
    pub check_interval_minutes: u64,

    /// Moltbook API credential (env: MOLTBOOK_API_KEY)
    pub moltbook_api_key: Option<String>,

    /// Moltbook agent name override (env: MOLTBOOK_USERNAME)
    pub moltbook_username: Option<String>,

    /// Alternate Moltbook endpoint for self-hosted instances
    /// (env: MOLTBOOK_BASE_URL)
    pub moltbook_base_url: Option<String>,

    /// Feature flags (optional behaviors)
    pub features: FeatureToggles,

    /// Per-day social activity caps
    pub limits: SafetyLimits,

    /// Directory for state: config, stores, activity and metrics logs
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            owner_name: "User".to_string(),
            timezone: "UTC".to_string(),
            check_interval_minutes: 30,
            moltbook_api_key: None,
            moltbook_username: None,
            moltbook_base_url: None,
            features: FeatureToggles::default(),
            limits: SafetyLimits::default(),
            data_dir,
        }
    }

    /// True when the Moltbook toggle is on AND a usable API key is present.
    ///
    /// This is the single gate for every Moltbook code path: a missing or
    /// empty credential disables the integration without failing startup.
    pub fn moltbook_enabled(&self) -> bool {
        self.features.moltbook
            && self
                .moltbook_api_key
                .as_deref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false)
    }

    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> Result<()> {
        if self.check_interval_minutes == 0 {
            bail!("check_interval_minutes must be greater than 0");
        }

        if self.check_interval_minutes > 24 * 60 {
            bail!(
                "check_interval_minutes ({}) is longer than a day\n\
                 Recommended range: 5-120 minutes",
                self.check_interval_minutes
            );
        }

        if self.limits.max_daily_posts == 0 {
            bail!("max_daily_posts must be greater than 0");
        }

        if self.limits.max_daily_posts > 100 {
            bail!(
                "max_daily_posts ({}) is unreasonably high\n\
                 Recommended range: 1-20\n\
                 High values will flood Moltbook with bot posts",
                self.limits.max_daily_posts
            );
        }

        if self.limits.max_daily_comments == 0 {
            bail!("max_daily_comments must be greater than 0");
        }

        if self.limits.max_daily_comments > 200 {
            bail!(
                "max_daily_comments ({}) is unreasonably high\n\
                 Recommended range: 1-50",
                self.limits.max_daily_comments
            );
        }

        // A key that is present but all whitespace is a config mistake,
        // not a disabled integration. Surface it instead of ignoring it.
        if let Some(key) = &self.moltbook_api_key {
            if !key.is_empty() && key.trim().is_empty() {
                bail!(
                    "moltbook_api_key is whitespace only\n\
                     Set a real key or remove the entry:\n  \
                     export MOLTBOOK_API_KEY=\"...\""
                );
            }
        }

        if self.owner_name.trim().is_empty() {
            bail!("owner_name must not be empty");
        }

        Ok(())
    }

    /// Save configuration to TOML file at `<data_dir>/config.toml`
    pub fn save(&self) -> Result<()> {
        use std::fs;

        let config_path = self.data_dir.join("config.toml");
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;

        let toml_config = TomlConfig {
            owner_name: Some(self.owner_name.clone()),
            timezone: Some(self.timezone.clone()),
            check_interval_minutes: Some(self.check_interval_minutes),
            moltbook_api_key: self.moltbook_api_key.clone(),
            moltbook_username: self.moltbook_username.clone(),
            moltbook_base_url: self.moltbook_base_url.clone(),
            features: Some(self.features.clone()),
            limits: Some(self.limits.clone()),
        };

        let toml_string =
            toml::to_string_pretty(&toml_config).context("Failed to serialize configuration")?;
        fs::write(&config_path, toml_string)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }
}

/// TOML-serializable config (subset of BotConfig)
#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct TomlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_interval_minutes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moltbook_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moltbook_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moltbook_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureToggles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<SafetyLimits>,
}
