//! Turns engine responses and front-end events into the text the user sees.

use std::sync::LazyLock;

use regex::Regex;
use wayne_knowledge::{CommandKind, KnowledgeError, Response};

pub const HISTORY_CLEARED: &str = "Chat history has been cleared.";
pub const LOAD_FAILED: &str = "Error loading knowledge base. Please try again later.";
pub const UPDATE_ACCEPTED: &str = "Thank you! The new information has been recorded for review.";
pub const UPDATE_REJECTED: &str =
    "There was an error processing your update. Please check the format and try again.";
pub const CHOICE_PROMPT: &str = "Please reply with the number of the most relevant question.";

/// The only markup answers may carry.
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a href='(.*?)' target='_blank'>(.*?)</a>").expect("anchor regex")
});

/// Rewrite embedded anchors as `TEXT (URL)`. Anything else stays literal.
pub fn sanitize_answer(text: &str) -> String {
    ANCHOR.replace_all(text, "$2 ($1)").into_owned()
}

/// Reply text for a matcher response.
pub fn render_response(response: &Response, help: &str) -> String {
    match response {
        Response::Command {
            command: CommandKind::ClearHistory,
        } => HISTORY_CLEARED.to_string(),
        Response::Command {
            command: CommandKind::Help,
        } => help.to_string(),
        Response::ExactAnswer { answer } | Response::UniquePartialAnswer { answer } => {
            sanitize_answer(answer)
        }
        Response::Disambiguation { candidates, total } => {
            let mut text = String::from("Did you mean:");
            for (index, question) in candidates.iter().enumerate() {
                text.push_str(&format!("\n  {}. {}", index + 1, question));
            }
            if *total > candidates.len() {
                text.push_str(&format!(
                    "\n  ({} of {} matches shown)",
                    candidates.len(),
                    total
                ));
            }
            text.push('\n');
            text.push_str(CHOICE_PROMPT);
            text
        }
        Response::NoMatch { query } => no_match(query),
    }
}

pub fn no_match(query: &str) -> String {
    format!(
        "I couldn't find an answer to \"{query}\". Try rephrasing or ask about a different topic."
    )
}

pub fn category_selected(label: &str) -> String {
    format!("You selected: {label}. Ask anything about this topic.")
}

pub fn update_rejected(err: &KnowledgeError) -> String {
    format!("{UPDATE_REJECTED} ({err})")
}

/// Category list shown under the welcome message.
pub fn category_menu(categories: &[String]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    Some(format!(
        "You can pick one of these categories (Tab or /category <name>): {}",
        categories.join(", ")
    ))
}
