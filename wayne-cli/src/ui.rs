use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use wayne_core::{ChatMessage, Sender};

use crate::theme;

/// Everything the UI needs for one frame
pub struct ChatView<'a> {
    pub log: &'a [ChatMessage],
    pub input: &'a str,
    pub cursor: usize,
    pub categories: &'a [String],
    pub active_category: Option<&'a str>,
    pub entries: usize,
    pub degraded: bool,
    pub replying: bool,
    /// Size of the pending "Did you mean" list
    pub choices: usize,
    pub status: &'a str,
}

/// UI component for rendering the TUI
#[derive(Debug, Default)]
pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    /// Draw the UI
    pub fn draw(&self, frame: &mut Frame, view: &ChatView<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Categories
                Constraint::Min(3),    // Chat history
                Constraint::Length(3), // Input area
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        self.draw_categories(frame, chunks[0], view);
        self.draw_chat_history(frame, chunks[1], view.log);
        self.draw_input_area(frame, chunks[2], view);
        self.draw_status_bar(frame, chunks[3], view);
    }

    fn draw_categories(&self, frame: &mut Frame, area: Rect, view: &ChatView<'_>) {
        let block = Block::default()
            .title("Categories (Tab to cycle)")
            .borders(Borders::ALL)
            .border_style(theme::border(false));

        let mut spans = vec![category_span("All", view.active_category.is_none())];
        for label in view.categories {
            spans.push(Span::raw(" "));
            spans.push(category_span(
                label,
                view.active_category == Some(label.as_str()),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    /// Draw the chat history, pinned to the newest lines
    fn draw_chat_history(&self, frame: &mut Frame, area: Rect, log: &[ChatMessage]) {
        let block = Block::default()
            .title("WAYNE Chat Assistant")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = usize::from(inner.width.max(1));
        let mut lines: Vec<Line> = Vec::new();
        for msg in log {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", sender_label(msg.sender)), theme::sender(msg.sender)),
                Span::styled(
                    msg.timestamp
                        .with_timezone(&chrono::Local)
                        .format("%H:%M:%S")
                        .to_string(),
                    theme::timestamp(),
                ),
            ]));
            for text_line in msg.text.lines() {
                lines.extend(wrap_text(text_line, width).into_iter().map(Line::from));
            }
            lines.push(Line::from(""));
        }

        let overflow = lines.len().saturating_sub(usize::from(inner.height));
        let skip = u16::try_from(overflow).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), inner);
    }

    fn draw_input_area(&self, frame: &mut Frame, area: Rect, view: &ChatView<'_>) {
        let title = if view.replying {
            "Input (waiting for reply...)"
        } else {
            "Input (Enter to send, Esc to quit, /categories /update /reload)"
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme::border(!view.replying));

        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(view.input), inner);

        let column = view.input[..view.cursor].chars().count();
        let cursor_x = inner.x + u16::try_from(column).unwrap_or(u16::MAX).min(inner.width);
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_status_bar(&self, frame: &mut Frame, area: Rect, view: &ChatView<'_>) {
        let knowledge = if view.degraded {
            Span::styled("● Knowledge base unavailable", theme::status_err())
        } else {
            Span::styled(format!("● {} entries", view.entries), theme::status_ok())
        };
        let category = format!("Category: {}", view.active_category.unwrap_or("All"));

        let mut status_text = vec![knowledge, Span::raw(" | "), Span::raw(category)];
        if view.replying {
            status_text.push(Span::raw(" | typing..."));
        } else if view.choices > 0 {
            status_text.push(Span::raw(format!(" | reply 1-{} to choose", view.choices)));
        }
        if !view.status.is_empty() {
            status_text.push(Span::raw(" | "));
            status_text.push(Span::raw(view.status));
        }

        let paragraph = Paragraph::new(Line::from(status_text))
            .alignment(Alignment::Left)
            .style(Style::default().bg(Color::Black).fg(Color::White));

        frame.render_widget(paragraph, area);
    }
}

fn category_span(label: &str, active: bool) -> Span<'static> {
    let text = format!(" {label} ");
    if active {
        Span::styled(text, theme::selected())
    } else {
        Span::raw(text)
    }
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Bot => "WAYNE",
        Sender::System => "System",
    }
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
