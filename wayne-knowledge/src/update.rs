//! Documentation-update stub.
//!
//! Users can propose a new question/answer pair. Submissions are validated and
//! logged for human review under the `wayne::updates` target; nothing is
//! written to the knowledge base. A caller that wants the entry searchable for
//! the rest of the session converts it with [`UpdateSubmission::into_entry`]
//! and appends it to the session itself.
//!
//! Two input shapes are accepted. A JSON object:
//!
//! ```text
//! {"category": "Health", "question": "...", "answer": "...", "keywords": ["..."]}
//! ```
//!
//! or labelled lines:
//!
//! ```text
//! Category: Health
//! Question: How much water should I drink?
//! Answer: About two litres a day.
//! Keywords: water, hydration
//! ```
//!
//! The labelled fields may also share a single line, as typed into a one-line
//! chat input: `Q: How much water? A: About two litres. K: water`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::loader::clean_keywords;
use crate::models::Entry;

/// Category used when neither the submission nor the caller names one.
pub const DEFAULT_UPDATE_CATEGORY: &str = "General";

/// A field label that starts after whitespace, mid-line.
static INLINE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+((?:category|question|answer|keywords|[cqak])\s*:)")
        .expect("valid label regex")
});

/// A validated proposal, recorded for review only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubmission {
    #[serde(default)]
    pub category: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(skip_deserializing, default = "Utc::now")]
    pub submitted_at: DateTime<Utc>,
}

impl UpdateSubmission {
    /// Build an entry, falling back to `default_category` and then to
    /// [`DEFAULT_UPDATE_CATEGORY`].
    pub fn into_entry(self, default_category: Option<&str>) -> Entry {
        let category = self
            .category
            .or_else(|| default_category.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_UPDATE_CATEGORY.to_string());
        Entry::new(category, self.question, self.answer, self.keywords)
    }
}

/// Outcome of [`submit_update`].
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Recorded for review. Not searchable unless the caller appends it.
    Accepted(UpdateSubmission),
    Rejected(KnowledgeError),
}

impl UpdateOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Validate a submission and record it for review.
pub fn submit_update(raw: &str) -> UpdateOutcome {
    match parse_submission(raw) {
        Ok(submission) => {
            info!(
                target: "wayne::updates",
                category = submission.category.as_deref().unwrap_or("-"),
                question = %submission.question,
                answer = %submission.answer,
                keywords = ?submission.keywords,
                "documentation update recorded for review"
            );
            UpdateOutcome::Accepted(submission)
        }
        Err(err) => {
            info!(target: "wayne::updates", error = %err, "documentation update rejected");
            UpdateOutcome::Rejected(err)
        }
    }
}

/// Parse either submission shape into a validated record.
pub fn parse_submission(raw: &str) -> KnowledgeResult<UpdateSubmission> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(KnowledgeError::EmptySubmission);
    }

    let submission = if trimmed.starts_with('{') {
        serde_json::from_str::<UpdateSubmission>(trimmed)
            .map_err(|err| KnowledgeError::InvalidSubmission(err.to_string()))?
    } else {
        parse_labelled(trimmed)?
    };

    normalize(submission)
}

fn parse_labelled(text: &str) -> KnowledgeResult<UpdateSubmission> {
    let mut category = None;
    let mut question = None;
    let mut answer: Option<String> = None;
    let mut keywords = Vec::new();

    let text = split_inline_labels(text);
    for line in text.lines() {
        let Some((label, value)) = line.split_once(':') else {
            // Continuation of a multi-line answer
            if let Some(answer) = answer.as_mut() {
                answer.push('\n');
                answer.push_str(line.trim_end());
            }
            continue;
        };
        let value = value.trim().to_string();
        match label.trim().to_lowercase().as_str() {
            "category" | "c" => category = Some(value),
            "question" | "q" => question = Some(value),
            "answer" | "a" => answer = Some(value),
            "keywords" | "k" => {
                keywords = value.split(',').map(str::to_string).collect();
            }
            _ => {
                if let Some(answer) = answer.as_mut() {
                    answer.push('\n');
                    answer.push_str(line.trim_end());
                } else {
                    return Err(KnowledgeError::InvalidSubmission(format!(
                        "unknown label '{}'",
                        label.trim()
                    )));
                }
            }
        }
    }

    Ok(UpdateSubmission {
        category,
        question: question.ok_or(KnowledgeError::MissingField("question"))?,
        answer: answer.ok_or(KnowledgeError::MissingField("answer"))?,
        keywords,
        submitted_at: Utc::now(),
    })
}

/// Put every label that follows other text on a line of its own.
fn split_inline_labels(text: &str) -> String {
    text.lines()
        .map(|line| INLINE_LABEL.replace_all(line, "\n$1"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize(mut submission: UpdateSubmission) -> KnowledgeResult<UpdateSubmission> {
    submission.question = submission.question.trim().to_string();
    if submission.question.is_empty() {
        return Err(KnowledgeError::MissingField("question"));
    }
    submission.answer = submission.answer.trim().to_string();
    if submission.answer.is_empty() {
        return Err(KnowledgeError::MissingField("answer"));
    }
    submission.category = submission
        .category
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty());
    submission.keywords = clean_keywords(submission.keywords);
    Ok(submission)
}
