//! Answer matching.
//!
//! [`respond`] decides what the assistant says to one query. Rules, first
//! success wins:
//!
//! 1. control commands (`clear chat`, `help`) anywhere in the query;
//! 2. exact question match (case-insensitive) within the search pool;
//! 3. partial match: the query contains an entry's question or one of its
//!    keywords. One hit answers directly, several ask the user to pick;
//! 4. no match.
//!
//! The search pool is the whole entry list, or only the active category.
//! Matching is pure: nothing here mutates the entries or the category.

use crate::KnowledgeSettings;
use crate::models::{Entry, Response};

pub(crate) mod commands;
pub(crate) mod matching;

pub use wayne_core::config::DEFAULT_MAX_CHOICES;

/// Tuning for [`respond_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// How many candidates a disambiguation offers at most.
    pub max_choices: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_choices: DEFAULT_MAX_CHOICES,
        }
    }
}

impl From<&KnowledgeSettings> for MatchOptions {
    fn from(settings: &KnowledgeSettings) -> Self {
        Self {
            max_choices: settings.max_choices.max(1),
        }
    }
}

/// Match a query with the default options.
pub fn respond(query: &str, entries: &[Entry], active_category: Option<&str>) -> Response {
    respond_with(query, entries, active_category, &MatchOptions::default())
}

pub fn respond_with(
    query: &str,
    entries: &[Entry],
    active_category: Option<&str>,
    options: &MatchOptions,
) -> Response {
    let lowered = query.to_lowercase();

    if let Some(command) = commands::detect_command(&lowered) {
        return Response::Command { command };
    }

    let pool = matching::search_pool(entries, active_category);

    if let Some(entry) = matching::exact_match(pool.clone(), &lowered) {
        return Response::ExactAnswer {
            answer: entry.answer.clone(),
        };
    }

    let partial = matching::partial_matches(pool, &lowered);
    match partial.as_slice() {
        [] => Response::NoMatch {
            query: query.to_string(),
        },
        [entry] => Response::UniquePartialAnswer {
            answer: entry.answer.clone(),
        },
        many => Response::Disambiguation {
            candidates: many
                .iter()
                .take(options.max_choices.max(1))
                .map(|entry| entry.question.clone())
                .collect(),
            total: many.len(),
        },
    }
}
