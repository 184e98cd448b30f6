//! Terminal-independent conversation flow.
//!
//! [`Conversation`] turns one line of user input into an [`Outcome`]: a query
//! answered by the matcher, a slash command, or nothing. Delivery timing and
//! drawing belong to the TUI; the one-shot `ask` mode uses the same flow.

use tracing::{info, warn};
use wayne_core::{ChatMessage, Config, KnowledgeSettings, Sender};
use wayne_knowledge::{
    ChatSession, CommandKind, MatchOptions, Response, UpdateOutcome, load_knowledge_base,
    source_from_settings, submit_update,
};

use crate::render;

/// A bot line waiting for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub text: String,
    /// Wipe the transcript right before this line is shown.
    pub clear_history: bool,
}

impl BotReply {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clear_history: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// User query. The echo is already in the transcript.
    Answer { echo: ChatMessage, reply: BotReply },
    /// Bot line that does not answer a query.
    Reply(BotReply),
    /// System notice; shown, never part of the transcript.
    Notice(String),
    Reload,
    Quit,
    Ignored,
}

pub struct Conversation {
    session: ChatSession,
    knowledge: KnowledgeSettings,
    help: String,
    pending_choices: Vec<String>,
}

impl Conversation {
    pub fn new(session: ChatSession, knowledge: KnowledgeSettings, help: impl Into<String>) -> Self {
        let options = MatchOptions::from(&knowledge);
        Self {
            session: session.with_options(options),
            knowledge,
            help: help.into(),
            pending_choices: Vec::new(),
        }
    }

    /// Load the knowledge base named by `config`. A failed load yields a
    /// degraded session instead of an error.
    pub async fn open(config: &Config) -> Self {
        let knowledge = config.knowledge_settings();
        let session = match Self::load(&knowledge).await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "knowledge base unavailable, starting degraded");
                ChatSession::degraded(err.to_string())
            }
        };
        Self::new(session, knowledge, config.settings.chat.help.clone())
    }

    async fn load(knowledge: &KnowledgeSettings) -> wayne_knowledge::KnowledgeResult<ChatSession> {
        let source = source_from_settings(knowledge)?;
        let loaded = load_knowledge_base(&source).await?;
        Ok(ChatSession::from_loaded(loaded))
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn pending_choices(&self) -> &[String] {
        &self.pending_choices
    }

    /// Record a bot line that is not a reply, such as the greeting.
    pub fn greet(&mut self, text: &str) -> Option<ChatMessage> {
        self.session.record(Sender::Bot, text).cloned()
    }

    pub fn handle_input(&mut self, raw: &str) -> Outcome {
        let text = raw.trim();
        if text.is_empty() {
            return Outcome::Ignored;
        }
        if let Some(command) = text.strip_prefix('/') {
            return self.handle_slash(command);
        }

        let Some(echo) = self.session.record(Sender::User, text).cloned() else {
            return Outcome::Ignored;
        };
        let query = self.resolve_choice(text);
        let response = self.session.respond(&query);

        if let Response::Disambiguation { candidates, .. } = &response {
            self.pending_choices = candidates.clone();
        }

        let reply = BotReply {
            text: render::render_response(&response, &self.help),
            clear_history: matches!(
                response,
                Response::Command {
                    command: CommandKind::ClearHistory
                }
            ),
        };
        Outcome::Answer { echo, reply }
    }

    /// A number answering a pending "Did you mean" list becomes that
    /// candidate's question. Any other input drops the list.
    fn resolve_choice(&mut self, text: &str) -> String {
        let choices = std::mem::take(&mut self.pending_choices);
        text.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| choices.get(index).cloned())
            .unwrap_or_else(|| text.to_string())
    }

    /// Show a reply. Returns the transcript line that was added.
    pub fn deliver(&mut self, reply: BotReply) -> Option<ChatMessage> {
        if reply.clear_history {
            self.session.clear_transcript();
            info!("chat history cleared");
        }
        self.session.record(Sender::Bot, reply.text).cloned()
    }

    fn handle_slash(&mut self, command: &str) -> Outcome {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "category" if arg.is_empty() => self.clear_category(),
            "category" => self.select_category(arg),
            "categories" => Outcome::Notice(self.categories_notice()),
            "update" => self.submit_update(arg),
            "reload" => Outcome::Reload,
            "quit" | "exit" => Outcome::Quit,
            _ => Outcome::Notice(format!(
                "Unknown command '/{name}'. Try /category, /categories, /update, /reload or /quit."
            )),
        }
    }

    fn categories_notice(&self) -> String {
        let categories = self.session.categories();
        if categories.is_empty() {
            "No categories available.".to_string()
        } else {
            format!("Categories: {}", categories.join(", "))
        }
    }

    fn select_category(&mut self, label: &str) -> Outcome {
        if !self.session.has_category(label) {
            return Outcome::Notice(format!(
                "Unknown category '{label}'. {}",
                self.categories_notice()
            ));
        }
        self.session.select_category(label);
        self.pending_choices.clear();
        Outcome::Reply(BotReply::new(render::category_selected(label)))
    }

    fn clear_category(&mut self) -> Outcome {
        self.session.clear_category();
        self.pending_choices.clear();
        Outcome::Notice("Category filter cleared. Searching all topics.".to_string())
    }

    /// Step through `none -> c1 -> ... -> cN -> none`.
    pub fn cycle_category(&mut self) -> Outcome {
        let categories = self.session.categories();
        let next = match self.session.active_category() {
            None => categories.first(),
            Some(active) => categories
                .iter()
                .position(|label| label == active)
                .and_then(|index| categories.get(index + 1)),
        };

        match next {
            Some(label) => self.select_category(label),
            None if self.session.active_category().is_some() => self.clear_category(),
            None => Outcome::Notice(self.categories_notice()),
        }
    }

    fn submit_update(&mut self, raw: &str) -> Outcome {
        let reply = match submit_update(raw) {
            UpdateOutcome::Accepted(submission) => {
                if self.knowledge.searchable_updates {
                    let entry = submission.into_entry(self.session.active_category());
                    self.session.append_entry(entry);
                }
                render::UPDATE_ACCEPTED.to_string()
            }
            UpdateOutcome::Rejected(err) => render::update_rejected(&err),
        };
        Outcome::Reply(BotReply::new(reply))
    }

    /// Re-read the knowledge base. The current entries stay on failure.
    pub async fn reload(&mut self) -> String {
        let source = match source_from_settings(&self.knowledge) {
            Ok(source) => source,
            Err(err) => return format!("Reload failed: {err}. Keeping the current knowledge base."),
        };

        match load_knowledge_base(&source).await {
            Ok(loaded) => {
                let skipped = loaded.skipped;
                self.session.replace_entries(loaded);
                self.pending_choices.clear();
                format!(
                    "Knowledge base reloaded: {} entries ({} skipped).",
                    self.session.entries().len(),
                    skipped
                )
            }
            Err(err) => {
                warn!(error = %err, "knowledge base reload failed");
                format!("Reload failed: {err}. Keeping the current knowledge base.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use wayne_knowledge::{Entry, LoadStatus};

    use super::*;

    fn conversation(searchable_updates: bool) -> Conversation {
        let entries = vec![
            Entry::new("About", "What is WAYNE?", "A system.", vec!["wayne".to_string()]),
            Entry::new("About", "Who is WAYNE?", "A person.", vec!["wayne".to_string()]),
            Entry::new(
                "Weather",
                "Will it rain today?",
                "See <a href='https://w.example' target='_blank'>forecast</a>",
                vec!["rain".to_string()],
            ),
        ];
        let knowledge = KnowledgeSettings {
            searchable_updates,
            ..Default::default()
        };
        Conversation::new(ChatSession::new(entries), knowledge, "Ask me things.")
    }

    fn reply_text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Answer { reply, .. } | Outcome::Reply(reply) => reply.text,
            other => panic!("expected a reply, got {other:?}"),
        }
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut chat = conversation(false);
        assert_eq!(chat.handle_input("   "), Outcome::Ignored);
        assert!(chat.session().transcript().is_empty());
    }

    #[test]
    fn query_is_echoed_and_answered_with_links_rewritten() {
        let mut chat = conversation(false);
        let Outcome::Answer { echo, reply } = chat.handle_input("  Will it rain today?  ") else {
            panic!("expected answer");
        };
        assert_eq!(echo.sender, Sender::User);
        assert_eq!(echo.text, "Will it rain today?");
        assert_eq!(reply.text, "See forecast (https://w.example)");
        assert!(!reply.clear_history);

        chat.deliver(reply);
        assert_eq!(chat.session().transcript().len(), 2);
    }

    #[test]
    fn numbered_reply_resolves_pending_choice() {
        let mut chat = conversation(false);
        let text = reply_text(chat.handle_input("wayne"));
        assert!(text.starts_with("Did you mean:"));
        assert_eq!(chat.pending_choices().len(), 2);

        assert_eq!(reply_text(chat.handle_input("2")), "A person.");
        assert!(chat.pending_choices().is_empty());

        // Without a pending list a number is just a query
        assert!(reply_text(chat.handle_input("2")).starts_with("I couldn't find"));
    }

    #[test]
    fn category_change_drops_pending_choices() {
        let mut chat = conversation(false);
        chat.handle_input("wayne");
        assert_eq!(chat.pending_choices().len(), 2);

        chat.handle_input("/category Weather");
        assert!(chat.pending_choices().is_empty());
        let Outcome::Answer { echo, reply } = chat.handle_input("1") else {
            panic!("expected answer");
        };
        assert_eq!(echo.text, "1");
        assert!(reply.text.starts_with("I couldn't find"));

        chat.handle_input("/category");
        chat.handle_input("wayne");
        chat.cycle_category();
        assert!(chat.pending_choices().is_empty());
    }

    #[test]
    fn out_of_range_choice_falls_through_to_matching() {
        let mut chat = conversation(false);
        chat.handle_input("wayne");
        assert!(reply_text(chat.handle_input("7")).starts_with("I couldn't find"));
    }

    #[test]
    fn clear_chat_wipes_transcript_on_delivery() {
        let mut chat = conversation(false);
        chat.greet("Hello");
        let Outcome::Answer { reply, .. } = chat.handle_input("please clear chat") else {
            panic!("expected answer");
        };
        assert!(reply.clear_history);
        assert_eq!(chat.session().transcript().len(), 2);

        let shown = chat.deliver(reply).unwrap();
        assert_eq!(shown.text, render::HISTORY_CLEARED);
        assert_eq!(chat.session().transcript().len(), 1);
    }

    #[test]
    fn help_uses_configured_text() {
        let mut chat = conversation(false);
        assert_eq!(reply_text(chat.handle_input("help")), "Ask me things.");
    }

    #[test]
    fn category_commands() {
        let mut chat = conversation(false);
        assert_eq!(
            reply_text(chat.handle_input("/category Weather")),
            "You selected: Weather. Ask anything about this topic."
        );
        assert_eq!(chat.session().active_category(), Some("Weather"));
        assert!(reply_text(chat.handle_input("wayne")).starts_with("I couldn't find"));

        let Outcome::Notice(notice) = chat.handle_input("/category Sports") else {
            panic!("expected notice");
        };
        assert!(notice.contains("Unknown category 'Sports'"));
        assert_eq!(chat.session().active_category(), Some("Weather"));

        assert!(matches!(chat.handle_input("/category"), Outcome::Notice(_)));
        assert_eq!(chat.session().active_category(), None);

        assert_eq!(
            chat.handle_input("/categories"),
            Outcome::Notice("Categories: About, Weather".to_string())
        );
    }

    #[test]
    fn slash_commands_are_not_transcribed() {
        let mut chat = conversation(false);
        chat.handle_input("/categories");
        assert_eq!(chat.handle_input("/reload"), Outcome::Reload);
        assert_eq!(chat.handle_input("/quit"), Outcome::Quit);
        assert!(matches!(chat.handle_input("/nope"), Outcome::Notice(_)));
        assert!(chat.session().transcript().is_empty());
    }

    #[test]
    fn tab_cycle_wraps_to_no_category() {
        let mut chat = conversation(false);
        chat.cycle_category();
        assert_eq!(chat.session().active_category(), Some("About"));
        chat.cycle_category();
        assert_eq!(chat.session().active_category(), Some("Weather"));
        assert!(matches!(chat.cycle_category(), Outcome::Notice(_)));
        assert_eq!(chat.session().active_category(), None);
    }

    #[test]
    fn accepted_update_stays_out_of_search_by_default() {
        let mut chat = conversation(false);
        assert_eq!(
            reply_text(chat.handle_input("/update Q: Opening hours? A: Nine to five.")),
            render::UPDATE_ACCEPTED
        );
        assert_eq!(chat.session().entries().len(), 3);
    }

    #[test]
    fn accepted_update_is_searchable_when_enabled() {
        let mut chat = conversation(true);
        chat.handle_input("/category Weather");
        chat.handle_input(r#"/update {"question": "Is it windy?", "answer": "A little."}"#);

        let added = chat.session().entries().last().unwrap();
        assert_eq!(added.category, "Weather");
        assert_eq!(reply_text(chat.handle_input("is it windy?")), "A little.");
    }

    #[test]
    fn one_line_labelled_update_is_searchable_when_enabled() {
        let mut chat = conversation(true);
        assert_eq!(
            reply_text(chat.handle_input("/update Q: Opening hours? A: Nine to five. K: hours")),
            render::UPDATE_ACCEPTED
        );
        assert_eq!(
            reply_text(chat.handle_input("what are your hours")),
            "Nine to five."
        );
    }

    #[test]
    fn rejected_update_explains_format() {
        let mut chat = conversation(true);
        let text = reply_text(chat.handle_input("/update"));
        assert!(text.starts_with(render::UPDATE_REJECTED));
        assert_eq!(chat.session().entries().len(), 3);
    }

    #[tokio::test]
    async fn reload_failure_keeps_entries() {
        let temp = tempfile::TempDir::new().unwrap();
        let knowledge = KnowledgeSettings {
            source_path: PathBuf::from("missing.json"),
            data_root_override: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let entries = vec![Entry::new("A", "q", "a", Vec::new())];
        let mut chat = Conversation::new(ChatSession::new(entries), knowledge, "");

        let notice = chat.reload().await;
        assert!(notice.starts_with("Reload failed"));
        assert_eq!(chat.session().entries().len(), 1);

        tokio::fs::write(
            temp.path().join("missing.json"),
            r#"[{"category": "B", "questions": [{"question": "x", "answer": "y"}, {"answer": "z"}]}]"#,
        )
        .await
        .unwrap();
        assert_eq!(
            chat.reload().await,
            "Knowledge base reloaded: 1 entries (1 skipped)."
        );
        assert_eq!(
            chat.session().status(),
            &LoadStatus::Loaded {
                entries: 1,
                skipped: 1
            }
        );
    }
}
