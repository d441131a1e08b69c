use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::chat::ChatState;
use crate::session::transcript::Role;
use crate::ui::layout::wrap_text;
use crate::ui::theme::Theme;

const INDENT: &str = "  ";

/// Scrolling chat history, pinned to the newest message.
pub struct TranscriptView<'a> {
    chat: &'a ChatState,
    theme: &'a Theme,
}

impl<'a> TranscriptView<'a> {
    pub fn new(chat: &'a ChatState, theme: &'a Theme) -> Self {
        Self { chat, theme }
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let body_width = width.saturating_sub(INDENT.len()).max(1);
        let mut lines: Vec<Line<'static>> = Vec::new();

        for msg in self.chat.transcript.messages() {
            let (label, color) = match msg.role {
                Role::User => ("You", colors.user_message()),
                Role::Assistant => ("Tutor", colors.assistant_message()),
            };
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(vec![
                Span::styled(
                    label.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", msg.display_time),
                    Style::default().fg(colors.timestamp()),
                ),
            ]));
            for row in wrap_text(&msg.content, body_width) {
                lines.push(Line::from(Span::styled(
                    format!("{INDENT}{row}"),
                    Style::default().fg(color),
                )));
            }
        }

        if self.chat.is_loading() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                "Tutor is typing...",
                Style::default()
                    .fg(colors.text_muted())
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        lines
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.chat.title()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.chat.transcript.is_empty() && !self.chat.is_loading() {
            let top = inner.height / 2;
            let greeting_area = Rect::new(inner.x, inner.y + top, inner.width, 1.min(inner.height));
            Paragraph::new(Line::from(Span::styled(
                self.chat.greeting(),
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Center)
            .render(greeting_area, buf);
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let overflow = lines.len().saturating_sub(inner.height as usize);
        let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
        Paragraph::new(lines).scroll((scroll, 0)).render(inner, buf);
    }
}
