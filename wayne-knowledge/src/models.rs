use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One question/answer record, tagged with the category it was loaded from.
///
/// Entries are immutable once built; `question` and `category` are never
/// blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub question: String,
    /// Opaque to matching. May embed an anchor link the renderer rewrites.
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub category: String,
}

impl Entry {
    pub fn new(
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            keywords,
            category: category.into(),
        }
    }
}

/// Where the raw knowledge base comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    /// JSON file on disk
    File(PathBuf),
    /// JSON text already in memory
    Inline(String),
}

impl KnowledgeSource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }
}

/// Result of a successful load: the flattened entries plus bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedKnowledge {
    /// Entries in group order, then within-group order
    pub entries: Vec<Entry>,
    /// Records dropped because they failed validation
    pub skipped: usize,
    /// Number of category groups read from the source
    pub groups: usize,
}

impl LoadedKnowledge {
    pub fn categories(&self) -> Vec<String> {
        categories(&self.entries)
    }
}

/// Distinct category labels in first-seen order.
pub fn categories(entries: &[Entry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        if !seen.iter().any(|label| label == &entry.category) {
            seen.push(entry.category.clone());
        }
    }
    seen
}

/// Control commands recognised ahead of any knowledge base lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    ClearHistory,
    Help,
}

/// Decision returned by the matching engine for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Command { command: CommandKind },
    ExactAnswer { answer: String },
    UniquePartialAnswer { answer: String },
    /// Two or more partial matches; `candidates` holds the first few
    /// questions in pool order, `total` how many qualified.
    Disambiguation { candidates: Vec<String>, total: usize },
    NoMatch { query: String },
}

impl Response {
    /// The answer text, when the response resolved to a single entry.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::ExactAnswer { answer } | Self::UniquePartialAnswer { answer } => Some(answer),
            _ => None,
        }
    }
}
