use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("missing data directory")]
    MissingDataDir,
    #[error("knowledge base unreachable at {path}: {source}")]
    Unreachable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed knowledge base: {0}")]
    MalformedSource(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("empty submission")]
    EmptySubmission,
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),
}

impl KnowledgeError {
    /// Whether this error means the knowledge base could not be loaded.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDataDir
                | Self::Unreachable { .. }
                | Self::Json(_)
                | Self::MalformedSource(_)
        )
    }

    /// Whether this error is a rejected documentation-update submission.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::EmptySubmission | Self::InvalidSubmission(_)
        )
    }
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
