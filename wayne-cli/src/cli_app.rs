use std::time::Duration;

use ratatui::prelude::*;
use tokio::time::Instant;

use wayne_core::ChatMessage;

use crate::chat::{BotReply, Conversation, Outcome};
use crate::render;
use crate::ui::{ChatView, Ui};

/// A reply that has been computed but not shown yet
#[derive(Debug)]
struct PendingReply {
    due: Instant,
    reply: BotReply,
}

/// Application state
pub struct App {
    /// Conversation state and matcher
    conversation: Conversation,
    /// Visible chat log: transcript lines plus system notices
    log: Vec<ChatMessage>,
    /// Current input
    input: String,
    /// Input cursor position (byte offset)
    cursor_position: usize,
    /// UI component
    ui: Ui,
    /// Cosmetic pause before a bot line appears
    reply_delay: Duration,
    /// Reply waiting for its delay to elapse
    pending: Option<PendingReply>,
    /// Categories shown in the header
    categories: Vec<String>,
    /// Whether to exit
    should_exit: bool,
    /// Status message
    status: String,
}

impl App {
    /// Create a new app instance and show the greeting
    pub fn new(conversation: Conversation, welcome: &str, reply_delay: Duration) -> Self {
        let categories = conversation.session().categories();
        let mut app = Self {
            conversation,
            log: Vec::new(),
            input: String::new(),
            cursor_position: 0,
            ui: Ui::new(),
            reply_delay,
            pending: None,
            categories,
            should_exit: false,
            status: String::new(),
        };

        if app.conversation.session().is_degraded() {
            app.push_notice(render::LOAD_FAILED);
        }
        if let Some(greeting) = app.conversation.greet(welcome) {
            app.log.push(greeting);
        }
        if let Some(menu) = render::category_menu(&app.categories)
            && let Some(line) = app.conversation.greet(&menu)
        {
            app.log.push(line);
        }
        app
    }

    /// Run the application main loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.should_exit() {
            let ui = &self.ui;
            let view = self.view();
            terminal.draw(|f| ui.draw(f, &view))?;
            self.handle_events().await?;
        }

        Ok(())
    }

    fn view(&self) -> ChatView<'_> {
        let session = self.conversation.session();
        ChatView {
            log: &self.log,
            input: &self.input,
            cursor: self.cursor_position,
            categories: &self.categories,
            active_category: session.active_category(),
            entries: session.entries().len(),
            degraded: session.is_degraded(),
            replying: self.pending.is_some(),
            choices: self.conversation.pending_choices().len(),
            status: &self.status,
        }
    }

    /// Send the input line. Held while a reply is still pending.
    pub(crate) async fn send_message(&mut self) {
        if self.pending.is_some() {
            self.set_status("Please wait for the reply");
            return;
        }

        let input = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        self.status.clear();

        let outcome = self.conversation.handle_input(&input);
        self.apply(outcome).await;
    }

    pub(crate) async fn cycle_category(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let outcome = self.conversation.cycle_category();
        self.apply(outcome).await;
    }

    async fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Answer { echo, reply } => {
                self.log.push(echo);
                self.schedule(reply);
            }
            Outcome::Reply(reply) => self.schedule(reply),
            Outcome::Notice(text) => self.push_notice(text),
            Outcome::Reload => {
                let notice = self.conversation.reload().await;
                self.categories = self.conversation.session().categories();
                self.push_notice(notice);
            }
            Outcome::Quit => self.should_exit = true,
            Outcome::Ignored => {}
        }
    }

    fn schedule(&mut self, reply: BotReply) {
        self.pending = Some(PendingReply {
            due: Instant::now() + self.reply_delay,
            reply,
        });
    }

    /// Show the pending reply once its delay has elapsed.
    pub(crate) fn deliver_due_reply(&mut self) {
        let Some(pending) = self.pending.take_if(|pending| pending.due <= Instant::now()) else {
            return;
        };
        if pending.reply.clear_history {
            self.log.clear();
        }
        if let Some(line) = self.conversation.deliver(pending.reply) {
            self.log.push(line);
        }
    }

    fn push_notice(&mut self, text: impl Into<String>) {
        self.log.push(ChatMessage::system(text));
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub(crate) fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub(crate) fn set_cursor_position(&mut self, value: usize) {
        self.cursor_position = value;
    }

    pub(crate) fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub(crate) fn set_should_exit(&mut self, value: bool) {
        self.should_exit = value;
    }

    pub(crate) fn set_status(&mut self, value: impl Into<String>) {
        self.status = value.into();
    }

    pub(crate) fn tick_rate() -> Duration {
        Duration::from_millis(50)
    }
}
