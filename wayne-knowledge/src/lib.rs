//! Knowledge base and answer matching for the WAYNE chat assistant.

pub mod engine;
pub mod errors;
pub mod loader;
pub mod models;
pub mod paths;
pub mod session;
pub mod update;

pub use wayne_core::config::KnowledgeSettings;
pub use engine::{MatchOptions, respond, respond_with};
pub use errors::{KnowledgeError, KnowledgeResult};
pub use loader::{load_knowledge_base, parse_knowledge_base};
pub use models::{CommandKind, Entry, KnowledgeSource, LoadedKnowledge, Response, categories};
pub use session::{ChatSession, LoadStatus};
pub use update::{UpdateOutcome, UpdateSubmission, submit_update};

/// Knowledge source described by resolved settings.
pub fn source_from_settings(settings: &KnowledgeSettings) -> KnowledgeResult<KnowledgeSource> {
    Ok(KnowledgeSource::File(paths::knowledge_base_path(settings)?))
}
