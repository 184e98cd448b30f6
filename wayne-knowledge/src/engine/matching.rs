use crate::models::Entry;

/// Entries eligible for a query: everything, or only the active category.
///
/// Category labels compare exactly (case-sensitive).
pub(crate) fn search_pool<'a>(
    entries: &'a [Entry],
    active_category: Option<&'a str>,
) -> impl Iterator<Item = &'a Entry> + Clone + 'a {
    entries
        .iter()
        .filter(move |entry| active_category.is_none_or(|label| entry.category == label))
}

/// First entry whose question equals the query, ignoring case.
pub(crate) fn exact_match<'a>(
    mut pool: impl Iterator<Item = &'a Entry>,
    lowered_query: &str,
) -> Option<&'a Entry> {
    pool.find(|entry| entry.question.to_lowercase() == lowered_query)
}

/// Whether the query contains the entry's question or any of its keywords.
pub(crate) fn is_partial_match(entry: &Entry, lowered_query: &str) -> bool {
    lowered_query.contains(&entry.question.to_lowercase())
        || entry
            .keywords
            .iter()
            .any(|keyword| lowered_query.contains(&keyword.to_lowercase()))
}

/// All partial matches in pool order.
pub(crate) fn partial_matches<'a>(
    pool: impl Iterator<Item = &'a Entry>,
    lowered_query: &str,
) -> Vec<&'a Entry> {
    pool.filter(|entry| is_partial_match(entry, lowered_query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, question: &str, keywords: &[&str]) -> Entry {
        Entry::new(
            category,
            question,
            format!("answer to {question}"),
            keywords.iter().map(|k| k.to_string()).collect(),
        )
    }

    #[test]
    fn pool_filters_by_exact_label() {
        let entries = vec![
            entry("Weather", "a", &[]),
            entry("weather", "b", &[]),
            entry("Health", "c", &[]),
        ];

        let all: Vec<_> = search_pool(&entries, None).map(|e| e.question.as_str()).collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        let weather: Vec<_> = search_pool(&entries, Some("Weather"))
            .map(|e| e.question.as_str())
            .collect();
        assert_eq!(weather, vec!["a"]);

        assert_eq!(search_pool(&entries, Some("Sports")).count(), 0);
    }

    #[test]
    fn exact_match_ignores_case_and_takes_first() {
        let entries = vec![
            entry("A", "What is WAYNE?", &[]),
            entry("B", "what is wayne?", &[]),
        ];
        let found = exact_match(entries.iter(), "what is wayne?").unwrap();
        assert_eq!(found.category, "A");
        assert!(exact_match(entries.iter(), "what is wayne").is_none());
    }

    #[test]
    fn partial_match_on_question_substring_or_keyword() {
        let by_question = entry("A", "Opening hours", &[]);
        assert!(is_partial_match(&by_question, "what are your opening hours today"));
        assert!(!is_partial_match(&by_question, "opening"));

        let by_keyword = entry("A", "Unrelated", &["Umbrella"]);
        assert!(is_partial_match(&by_keyword, "do i need an umbrella?"));
        assert!(!is_partial_match(&by_keyword, "do i need a coat?"));
    }

    #[test]
    fn partial_matches_keep_pool_order() {
        let entries = vec![
            entry("A", "one", &["x"]),
            entry("A", "two", &[]),
            entry("A", "three", &["x"]),
        ];
        let found: Vec<_> = partial_matches(entries.iter(), "x marks the spot")
            .into_iter()
            .map(|e| e.question.as_str())
            .collect();
        assert_eq!(found, vec!["one", "three"]);
    }
}
