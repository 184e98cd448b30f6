use std::path::PathBuf;

use crate::KnowledgeSettings;
use crate::errors::{KnowledgeError, KnowledgeResult};

pub fn data_root(settings: &KnowledgeSettings) -> KnowledgeResult<PathBuf> {
    if let Some(path) = &settings.data_root_override {
        return Ok(path.clone());
    }

    let dir = dirs::data_dir().ok_or(KnowledgeError::MissingDataDir)?;
    Ok(dir.join("wayne-chat"))
}

/// Absolute location of the knowledge base file.
pub fn knowledge_base_path(settings: &KnowledgeSettings) -> KnowledgeResult<PathBuf> {
    if settings.source_path.is_absolute() {
        return Ok(settings.source_path.clone());
    }
    Ok(data_root(settings)?.join(&settings.source_path))
}
