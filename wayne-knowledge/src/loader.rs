//! Knowledge base loading.
//!
//! The source is a JSON list of category groups:
//!
//! ```json
//! [
//!   { "category": "Weather",
//!     "questions": [
//!       { "question": "Will it rain today?", "answer": "...", "keywords": ["rain"] }
//!     ] }
//! ]
//! ```
//!
//! Loading happens in two steps: validation turns the loosely-typed JSON into
//! [`KnowledgeGroup`]s, then [`flatten`] tags every record with its group's
//! category. Broken groups fail the whole load; broken records are skipped and
//! counted.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::models::{Entry, KnowledgeSource, LoadedKnowledge};

/// A validated category group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeGroup {
    pub category: String,
    pub questions: Vec<QuestionRecord>,
}

/// A validated question record, not yet tagged with a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    category: Option<String>,
    questions: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Fetch, validate and flatten the knowledge base.
///
/// A single attempt; callers that want a reload simply call this again.
pub async fn load_knowledge_base(source: &KnowledgeSource) -> KnowledgeResult<LoadedKnowledge> {
    let raw = match source {
        KnowledgeSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| KnowledgeError::Unreachable {
                path: path.clone(),
                source,
            })?,
        KnowledgeSource::Inline(text) => text.clone(),
    };

    let loaded = parse_knowledge_base(&raw)?;
    info!(
        source = %source.describe(),
        groups = loaded.groups,
        entries = loaded.entries.len(),
        skipped = loaded.skipped,
        "knowledge base loaded"
    );
    Ok(loaded)
}

/// Validate and flatten raw knowledge base JSON.
pub fn parse_knowledge_base(raw: &str) -> KnowledgeResult<LoadedKnowledge> {
    let (groups, skipped) = validate_groups(raw)?;
    let group_count = groups.len();

    Ok(LoadedKnowledge {
        entries: flatten(groups),
        skipped,
        groups: group_count,
    })
}

/// Tag every record with its group's category, preserving group order and
/// then record order.
pub fn flatten(groups: Vec<KnowledgeGroup>) -> Vec<Entry> {
    groups
        .into_iter()
        .flat_map(|group| {
            let category = group.category;
            group.questions.into_iter().map(move |record| Entry {
                question: record.question,
                answer: record.answer,
                keywords: record.keywords,
                category: category.clone(),
            })
        })
        .collect()
}

fn validate_groups(raw: &str) -> KnowledgeResult<(Vec<KnowledgeGroup>, usize)> {
    let value: Value = serde_json::from_str(raw)?;
    let items = value.as_array().ok_or_else(|| {
        KnowledgeError::MalformedSource("expected a list of category groups".to_string())
    })?;

    let mut groups = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (group_index, item) in items.iter().enumerate() {
        let (category, records) = read_group(group_index, item)?;

        let mut questions = Vec::with_capacity(records.len());
        for (record_index, record) in records.iter().enumerate() {
            match read_record(record) {
                Ok(question) => questions.push(question),
                Err(err) => {
                    warn!(
                        category = %category,
                        index = record_index,
                        error = %err,
                        "skipping malformed knowledge record"
                    );
                    skipped += 1;
                }
            }
        }

        if questions.is_empty() {
            debug!(category = %category, "category group has no usable questions");
        }
        groups.push(KnowledgeGroup {
            category,
            questions,
        });
    }

    Ok((groups, skipped))
}

fn read_group(index: usize, item: &Value) -> KnowledgeResult<(String, Vec<Value>)> {
    let group = RawGroup::deserialize(item)
        .map_err(|err| KnowledgeError::MalformedSource(format!("group {index}: {err}")))?;

    let category = group
        .category
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .ok_or_else(|| {
            KnowledgeError::MalformedSource(format!("group {index}: missing category"))
        })?;
    let questions = group.questions.ok_or_else(|| {
        KnowledgeError::MalformedSource(format!("group {index} ({category}): missing questions"))
    })?;

    Ok((category, questions))
}

fn read_record(record: &Value) -> KnowledgeResult<QuestionRecord> {
    let raw = RawQuestion::deserialize(record)?;

    let question = raw
        .question
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(KnowledgeError::MissingField("question"))?;
    let answer = raw.answer.ok_or(KnowledgeError::MissingField("answer"))?;

    Ok(QuestionRecord {
        question,
        answer,
        keywords: clean_keywords(raw.keywords),
    })
}

/// Trim keywords and drop blank ones; a blank keyword would be contained in
/// every query.
pub(crate) fn clean_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "category": "Weather",
            "questions": [
                { "question": "Will it rain today?", "answer": "Bring an umbrella.", "keywords": ["rain", "umbrella"] },
                { "question": "Is it sunny?", "answer": "Mostly.", "keywords": [] }
            ]
        },
        {
            "category": "Health",
            "questions": [
                { "question": "How much water should I drink?", "answer": "About two litres.", "keywords": ["water"] }
            ]
        }
    ]"#;

    #[test]
    fn flattens_in_group_then_record_order() {
        let loaded = parse_knowledge_base(SAMPLE).expect("parse");
        assert_eq!(loaded.groups, 2);
        assert_eq!(loaded.skipped, 0);

        let questions: Vec<_> = loaded.entries.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(
            questions,
            vec![
                "Will it rain today?",
                "Is it sunny?",
                "How much water should I drink?"
            ]
        );
        let categories: Vec<_> = loaded.entries.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Weather", "Weather", "Health"]);
        assert_eq!(loaded.categories(), vec!["Weather", "Health"]);
    }

    #[test]
    fn skips_malformed_records_and_counts_them() {
        let raw = r#"[
            { "category": "Misc", "questions": [
                { "question": "Good?", "answer": "Yes." },
                { "answer": "no question" },
                { "question": "   ", "answer": "blank question" },
                { "question": "No answer?" },
                { "question": "Bad keywords?", "answer": "x", "keywords": [1, 2] },
                "not an object"
            ] }
        ]"#;

        let loaded = parse_knowledge_base(raw).expect("parse");
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.skipped, 5);
        assert_eq!(loaded.entries[0].question, "Good?");
        assert!(loaded.entries[0].keywords.is_empty());
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let raw = r#"[{ "category": "C", "questions": [
            { "question": "Q", "answer": "A", "keywords": [" wayne ", "", "   "] }
        ] }]"#;
        let loaded = parse_knowledge_base(raw).unwrap();
        assert_eq!(loaded.entries[0].keywords, vec!["wayne"]);
    }

    #[test]
    fn malformed_groups_fail_the_load() {
        let cases = [
            r#"{ "category": "C", "questions": [] }"#,
            r#"[ 42 ]"#,
            r#"[ { "questions": [] } ]"#,
            r#"[ { "category": "  ", "questions": [] } ]"#,
            r#"[ { "category": "C" } ]"#,
            r#"[ { "category": "C", "questions": "nope" } ]"#,
        ];
        for raw in cases {
            let err = parse_knowledge_base(raw).unwrap_err();
            assert!(
                matches!(err, KnowledgeError::MalformedSource(_)),
                "{raw} gave {err:?}"
            );
            assert!(err.is_load_error());
        }
    }

    #[test]
    fn invalid_json_is_a_load_error() {
        let err = parse_knowledge_base("[{").unwrap_err();
        assert!(matches!(err, KnowledgeError::Json(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn empty_list_loads_nothing() {
        let loaded = parse_knowledge_base("[]").unwrap();
        assert!(loaded.entries.is_empty());
        assert_eq!(loaded.groups, 0);
    }

    #[test]
    fn flatten_keeps_every_record() {
        let groups = vec![
            KnowledgeGroup {
                category: "A".to_string(),
                questions: vec![QuestionRecord {
                    question: "q1".to_string(),
                    answer: "a1".to_string(),
                    keywords: vec!["k".to_string()],
                }],
            },
            KnowledgeGroup {
                category: "B".to_string(),
                questions: Vec::new(),
            },
        ];
        let entries = flatten(groups);
        assert_eq!(entries, vec![Entry::new("A", "q1", "a1", vec!["k".to_string()])]);
    }
}
