pub mod config;
pub mod message;

// Config re-exports
pub use config::{
    ChatSettings, Config, ConfigError, EnvOverrides, KnowledgeSettings, LoggingSettings,
    Settings, SettingsError, load_dotenv,
};

// Message re-exports
pub use message::{ChatMessage, Sender, Transcript};
