// Configuration module
// Public interface for configuration loading

mod identity;
mod loader;
mod settings;

pub use identity::BotIdentity;
pub use loader::{load_config, load_config_from};
pub use settings::{BotConfig, FeatureToggles, SafetyLimits};
