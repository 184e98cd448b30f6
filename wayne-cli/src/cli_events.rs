use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::cli_app::App;

impl App {
    /// Handle events
    pub(crate) async fn handle_events(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.deliver_due_reply();

        if event::poll(Self::tick_rate())?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key_event(key).await;
        }

        Ok(())
    }

    /// Handle key event
    pub(crate) async fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                self.set_should_exit(true);
            }
            KeyCode::Esc => {
                self.set_should_exit(true);
            }
            KeyCode::Enter => {
                self.send_message().await;
            }
            KeyCode::Tab => {
                self.cycle_category().await;
            }
            KeyCode::Char(c) => {
                let cursor = self.cursor_position();
                self.input_mut().insert(cursor, c);
                self.set_cursor_position(cursor + c.len_utf8());
            }
            KeyCode::Backspace => {
                if let Some(previous) = self.previous_boundary() {
                    self.input_mut().remove(previous);
                    self.set_cursor_position(previous);
                }
            }
            KeyCode::Left => {
                if let Some(previous) = self.previous_boundary() {
                    self.set_cursor_position(previous);
                }
            }
            KeyCode::Right => {
                let cursor = self.cursor_position();
                if let Some(c) = self.input()[cursor..].chars().next() {
                    self.set_cursor_position(cursor + c.len_utf8());
                }
            }
            KeyCode::Home => self.set_cursor_position(0),
            KeyCode::End => {
                let end = self.input().len();
                self.set_cursor_position(end);
            }
            _ => {}
        }
    }

    /// Byte offset of the character before the cursor.
    fn previous_boundary(&self) -> Option<usize> {
        let cursor = self.cursor_position();
        self.input()[..cursor]
            .char_indices()
            .next_back()
            .map(|(index, _)| index)
    }
}
