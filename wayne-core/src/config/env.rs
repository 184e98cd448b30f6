//! Overrides loaded from environment variables.
//!
//! These take precedence over the TOML settings and are handy for pointing
//! a single run at a different knowledge base without editing config files.

use std::env;

/// Values read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Knowledge base path (env: WAYNE_KNOWLEDGE_PATH)
    pub knowledge_path: Option<String>,

    /// Data root for relative paths (env: WAYNE_DATA_DIR)
    pub data_dir: Option<String>,
}

impl EnvOverrides {
    /// Load overrides from environment variables, reading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self::from_env_inner()
    }

    /// Internal method to load from environment without loading .env
    pub(crate) fn from_env_inner() -> Self {
        Self {
            knowledge_path: non_empty_var("WAYNE_KNOWLEDGE_PATH"),
            data_dir: non_empty_var("WAYNE_DATA_DIR"),
        }
    }

    /// Whether any override is set.
    pub fn is_empty(&self) -> bool {
        self.knowledge_path.is_none() && self.data_dir.is_none()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
