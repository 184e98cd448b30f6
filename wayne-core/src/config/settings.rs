//! Settings configuration loaded from TOML files.
//!
//! This module handles the chat assistant's configuration stored in TOML
//! format in the XDG config directory (~/.config/wayne-chat/config.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default TOML configuration file content
const DEFAULT_CONFIG_TOML: &str = r#"# wayne-chat configuration file
# Located at: ~/.config/wayne-chat/config.toml
#
# Environment overrides:
#   - WAYNE_KNOWLEDGE_PATH (replaces knowledge.path)
#   - WAYNE_DATA_DIR (root used to resolve a relative knowledge.path)

[knowledge]
# Knowledge base JSON file: [{ "category": ..., "questions": [...] }, ...]
# A relative path is resolved against WAYNE_DATA_DIR, or the user data
# directory (~/.local/share/wayne-chat) when unset. To use the sample shipped
# in the repository, run with WAYNE_DATA_DIR=. from the checkout or copy
# docs/questions.json into the data directory.
path = "docs/questions.json"

[matching]
# Maximum number of candidate questions offered when a query is ambiguous
max_choices = 3

[chat]
# Cosmetic pause before the assistant replies
reply_delay_ms = 300
welcome = "Hello! Welcome to the WAYNE Chat Assistant. Ask me anything."
help = "You can ask me questions or select a category to narrow down your query. Try asking about weather, health, or technology."

[updates]
# Make accepted documentation updates searchable until the next reload
searchable_in_session = false

[logging]
level = "info"
# file_path = "/tmp/wayne-chat.log"
"#;

/// Settings loaded from TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Knowledge base source
    #[serde(default)]
    pub knowledge: KnowledgeSourceSettings,

    /// Matching engine tuning
    #[serde(default)]
    pub matching: MatchingSettings,

    /// Conversation behaviour
    #[serde(default)]
    pub chat: ChatSettings,

    /// Documentation-update stub
    #[serde(default)]
    pub updates: UpdateSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Knowledge base source settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnowledgeSourceSettings {
    /// Path to the knowledge base JSON file
    #[serde(default = "default_knowledge_path")]
    pub path: String,
}

/// Matching engine settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingSettings {
    /// Cap on the disambiguation list
    #[serde(default = "default_max_choices")]
    pub max_choices: usize,
}

/// Chat front-end settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatSettings {
    /// Delay before a bot reply is shown, in milliseconds
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Greeting shown when the chat opens
    #[serde(default = "default_welcome")]
    pub welcome: String,

    /// Reply to the help command
    #[serde(default = "default_help")]
    pub help: String,
}

/// Documentation-update settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateSettings {
    /// Append accepted submissions to the in-memory entry list
    #[serde(default)]
    pub searchable_in_session: bool,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file used while the TUI owns the terminal
    pub file_path: Option<String>,
}

// Default value functions

fn default_knowledge_path() -> String {
    "docs/questions.json".to_string()
}

fn default_max_choices() -> usize {
    3
}

fn default_reply_delay_ms() -> u64 {
    300
}

fn default_welcome() -> String {
    "Hello! Welcome to the WAYNE Chat Assistant. Ask me anything.".to_string()
}

fn default_help() -> String {
    "You can ask me questions or select a category to narrow down your query. \
     Try asking about weather, health, or technology."
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for KnowledgeSourceSettings {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_choices: default_max_choices(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            welcome: default_welcome(),
            help: default_help(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
        }
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

impl Settings {
    /// Load settings from the TOML configuration file.
    ///
    /// If the config file doesn't exist, creates it with default values.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("Creating default configuration at {:?}", config_path);
            Self::create_default_config(&config_path)?;
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        Ok(settings)
    }

    /// Get the configuration file path.
    ///
    /// Uses `WAYNE_CONFIG_DIR` when set, otherwise the XDG config directory.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        if let Ok(override_dir) = std::env::var("WAYNE_CONFIG_DIR") {
            return Ok(PathBuf::from(override_dir).join("config.toml"));
        }

        let config_dir = dirs::config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)?
            .join("wayne-chat");

        Ok(config_dir.join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG_TOML)?;
        Ok(())
    }

    /// Reply delay as a `Duration`.
    pub fn reply_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.chat.reply_delay_ms)
    }
}
