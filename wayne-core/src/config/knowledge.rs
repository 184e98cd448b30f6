//! Knowledge system configuration types.
//!
//! These types define the resolved (non-optional) settings used by
//! `wayne-knowledge`. They are created from the user-facing TOML structs
//! via `From`, then adjusted by environment overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::env::EnvOverrides;
use super::settings::Settings;

/// Fallback disambiguation cap.
pub const DEFAULT_MAX_CHOICES: usize = 3;

/// Resolved knowledge settings (all values filled with defaults).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// Knowledge base file; relative paths resolve against the data root.
    pub source_path: PathBuf,
    /// Override the root data directory used for relative paths.
    #[serde(default)]
    pub data_root_override: Option<PathBuf>,
    /// Disambiguation list cap (never zero).
    #[serde(default = "default_max_choices")]
    pub max_choices: usize,
    /// Append accepted documentation updates to the live entry list.
    #[serde(default)]
    pub searchable_updates: bool,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("docs/questions.json"),
            data_root_override: None,
            max_choices: default_max_choices(),
            searchable_updates: false,
        }
    }
}

fn default_max_choices() -> usize {
    DEFAULT_MAX_CHOICES
}

impl From<&Settings> for KnowledgeSettings {
    fn from(value: &Settings) -> Self {
        let mut settings = KnowledgeSettings::default();
        let path = value.knowledge.path.trim();
        if !path.is_empty() {
            settings.source_path = PathBuf::from(path);
        }
        if value.matching.max_choices > 0 {
            settings.max_choices = value.matching.max_choices;
        }
        settings.searchable_updates = value.updates.searchable_in_session;
        settings
    }
}

impl KnowledgeSettings {
    /// Apply environment overrides on top of file settings.
    pub fn with_overrides(mut self, overrides: &EnvOverrides) -> Self {
        if let Some(path) = &overrides.knowledge_path {
            self.source_path = PathBuf::from(path);
        }
        if let Some(dir) = &overrides.data_dir {
            self.data_root_override = Some(PathBuf::from(dir));
        }
        self
    }
}
