// Configuration loader
// Loads settings from ~/.moltbot/config.toml and credentials from the environment

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::{BotConfig, TomlConfig};

/// Load configuration from the default data directory (`~/.moltbot`)
pub fn load_config() -> Result<BotConfig> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    load_config_from(home.join(".moltbot"))
}

/// Load configuration rooted at an explicit data directory.
///
/// Resolution order: file values, then environment credentials on top,
/// then built-in defaults for anything still unset. A missing config file
/// is not an error; the bot runs on defaults.
pub fn load_config_from(data_dir: PathBuf) -> Result<BotConfig> {
    let mut config = BotConfig::new(data_dir);

    let config_path = config.data_dir.join("config.toml");
    if config_path.exists() {
        apply_file(&mut config, &config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    }

    overlay_credentials(
        &mut config,
        std::env::var("MOLTBOOK_API_KEY").ok(),
        std::env::var("MOLTBOOK_USERNAME").ok(),
    );
    if let Ok(url) = std::env::var("MOLTBOOK_BASE_URL") {
        if !url.trim().is_empty() {
            config.moltbook_base_url = Some(url);
        }
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn apply_file(config: &mut BotConfig, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: TomlConfig = toml::from_str(&contents)
        .with_context(|| format!("Invalid TOML in {}", path.display()))?;

    if let Some(owner_name) = file.owner_name {
        config.owner_name = owner_name;
    }
    if let Some(timezone) = file.timezone {
        config.timezone = timezone;
    }
    if let Some(minutes) = file.check_interval_minutes {
        config.check_interval_minutes = minutes;
    }
    if file.moltbook_api_key.is_some() {
        config.moltbook_api_key = file.moltbook_api_key;
    }
    if file.moltbook_username.is_some() {
        config.moltbook_username = file.moltbook_username;
    }
    if file.moltbook_base_url.is_some() {
        config.moltbook_base_url = file.moltbook_base_url;
    }
    if let Some(features) = file.features {
        config.features = features;
    }
    if let Some(limits) = file.limits {
        config.limits = limits;
    }

    tracing::debug!("Loaded configuration from {:?}", path);
    Ok(())
}

/// Environment credentials win over file values. Empty values are ignored
/// so `MOLTBOOK_API_KEY=""` cannot mask a key set in the config file.
fn overlay_credentials(
    config: &mut BotConfig,
    api_key: Option<String>,
    username: Option<String>,
) {
    if let Some(key) = api_key {
        if !key.trim().is_empty() {
            config.moltbook_api_key = Some(key);
        }
    }
    if let Some(name) = username {
        if !name.trim().is_empty() {
            config.moltbook_username = Some(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.owner_name, "User");
        assert_eq!(config.check_interval_minutes, 30);
    }

    #[test]
    fn test_load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            r#"
owner_name = "Alex"
timezone = "Europe/Berlin"
check_interval_minutes = 5

[features]
moltbook = false

[limits]
max_daily_posts = 2
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.owner_name, "Alex");
        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(config.check_interval_minutes, 5);
        assert!(!config.features.moltbook);
        assert_eq!(config.limits.max_daily_posts, 2);
        // Unset limit keeps its default
        assert_eq!(config.limits.max_daily_comments, 10);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "owner_name = [broken").unwrap();
        assert!(load_config_from(dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "check_interval_minutes = 0").unwrap();
        assert!(load_config_from(dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_env_key_wins_over_file_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BotConfig::new(dir.path().to_path_buf());
        config.moltbook_api_key = Some("from-file".to_string());

        overlay_credentials(&mut config, Some("from-env".to_string()), None);
        assert_eq!(config.moltbook_api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_empty_env_key_does_not_mask_file_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BotConfig::new(dir.path().to_path_buf());
        config.moltbook_api_key = Some("from-file".to_string());

        overlay_credentials(&mut config, Some(String::new()), None);
        assert_eq!(config.moltbook_api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_username_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BotConfig::new(dir.path().to_path_buf());

        overlay_credentials(&mut config, None, Some("moltusername".to_string()));
        assert_eq!(config.moltbook_username.as_deref(), Some("moltusername"));
    }
}
