//! Per-conversation state.
//!
//! [`ChatSession`] bundles the entry list, the active category filter and the
//! transcript. The front-end is the only writer; it mutates the session
//! between queries and the matching engine only ever sees read-only borrows.

use tracing::{debug, info};
use wayne_core::{ChatMessage, Sender, Transcript};

use crate::engine::{self, MatchOptions};
use crate::models::{Entry, LoadedKnowledge, Response, categories};

/// Whether the knowledge base loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { entries: usize, skipped: usize },
    /// Running on an empty entry list after a failed load.
    Degraded { reason: String },
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    entries: Vec<Entry>,
    active_category: Option<String>,
    transcript: Transcript,
    status: LoadStatus,
    options: MatchOptions,
}

impl ChatSession {
    pub fn new(entries: Vec<Entry>) -> Self {
        let status = LoadStatus::Loaded {
            entries: entries.len(),
            skipped: 0,
        };
        Self {
            entries,
            active_category: None,
            transcript: Transcript::new(),
            status,
            options: MatchOptions::default(),
        }
    }

    pub fn from_loaded(loaded: LoadedKnowledge) -> Self {
        let mut session = Self::new(loaded.entries);
        session.status = LoadStatus::Loaded {
            entries: session.entries.len(),
            skipped: loaded.skipped,
        };
        session
    }

    /// Session with no entries; every query falls through to no-match.
    pub fn degraded(reason: impl Into<String>) -> Self {
        let mut session = Self::new(Vec::new());
        session.status = LoadStatus::Degraded {
            reason: reason.into(),
        };
        session
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, LoadStatus::Degraded { .. })
    }

    /// Distinct categories in knowledge base order.
    pub fn categories(&self) -> Vec<String> {
        categories(&self.entries)
    }

    pub fn has_category(&self, label: &str) -> bool {
        self.entries.iter().any(|entry| entry.category == label)
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    /// Restrict later queries to `label`. Returns whether the label exists;
    /// unknown labels are still applied and simply leave the pool empty.
    pub fn select_category(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        let known = self.has_category(&label);
        debug!(category = %label, known, "category selected");
        self.active_category = Some(label);
        known
    }

    pub fn clear_category(&mut self) {
        self.active_category = None;
    }

    /// Match a query against the current pool.
    pub fn respond(&self, query: &str) -> Response {
        engine::respond_with(
            query,
            &self.entries,
            self.active_category.as_deref(),
            &self.options,
        )
    }

    /// Swap in a freshly loaded knowledge base in one step.
    ///
    /// The active category is reset along with the list.
    pub fn replace_entries(&mut self, loaded: LoadedKnowledge) {
        self.entries = loaded.entries;
        self.status = LoadStatus::Loaded {
            entries: self.entries.len(),
            skipped: loaded.skipped,
        };

        if let Some(label) = self.active_category.take() {
            info!(category = %label, "active category reset on reload");
        }
    }

    /// Make an extra entry searchable for the rest of the session.
    pub fn append_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
        if let LoadStatus::Loaded { entries, .. } = &mut self.status {
            *entries = self.entries.len();
        }
    }

    /// Append a user or bot line. System notices are not transcript lines
    /// and are ignored here.
    pub fn record(&mut self, sender: Sender, text: impl Into<String>) -> Option<&ChatMessage> {
        if sender == Sender::System {
            return None;
        }
        Some(self.transcript.push(ChatMessage::new(sender, text)))
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }
}
