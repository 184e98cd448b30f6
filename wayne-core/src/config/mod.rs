//! Configuration management for wayne-chat.
//!
//! Settings come from a TOML file; a couple of environment variables can
//! override where the knowledge base is read from.
//!
//! # Configuration Sources
//!
//! ## Environment Variables
//! - `WAYNE_CONFIG_DIR` - directory holding `config.toml`
//! - `WAYNE_KNOWLEDGE_PATH` - knowledge base file
//! - `WAYNE_DATA_DIR` - root for relative knowledge base paths
//!
//! ## Settings (TOML File)
//! Located at `~/.config/wayne-chat/config.toml`:
//! ```toml
//! [knowledge]
//! path = "docs/questions.json"
//!
//! [matching]
//! max_choices = 3
//!
//! [chat]
//! reply_delay_ms = 300
//!
//! [logging]
//! level = "info"
//! ```

mod env;
pub mod knowledge;
mod settings;

pub use env::EnvOverrides;
pub use knowledge::{DEFAULT_MAX_CHOICES, KnowledgeSettings};
pub use settings::{
    ChatSettings, KnowledgeSourceSettings, LoggingSettings, MatchingSettings, Settings,
    SettingsError, UpdateSettings,
};

/// Combined configuration: file settings plus environment overrides.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Settings loaded from TOML configuration file
    pub settings: Settings,
    /// Overrides loaded from environment variables
    pub overrides: EnvOverrides,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file cannot be created, read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let overrides = EnvOverrides::from_env();
        let settings = Settings::load()?;

        Ok(Self {
            settings,
            overrides,
        })
    }

    /// Resolved knowledge settings with environment overrides applied.
    pub fn knowledge_settings(&self) -> KnowledgeSettings {
        KnowledgeSettings::from(&self.settings).with_overrides(&self.overrides)
    }

    /// Configured log level.
    pub fn log_level(&self) -> &str {
        &self.settings.logging.level
    }
}

/// Load .env file if it exists (for development convenience).
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
