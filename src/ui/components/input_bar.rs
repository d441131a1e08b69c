use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const PLACEHOLDER: &str = "Type your message here...";

pub struct InputBar<'a> {
    input: &'a LineInput,
    locked: bool,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(input: &'a LineInput, locked: bool, theme: &'a Theme) -> Self {
        Self {
            input,
            locked,
            theme,
        }
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.locked {
            colors.border()
        } else {
            colors.border_focused()
        };
        let counter = format!(" {}/{} ", self.input.char_count(), self.input.max_chars());

        let block = Block::bordered()
            .title(" Message ")
            .title(Line::from(counter).right_aligned())
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.input_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.locked {
            Paragraph::new(Line::from(Span::styled(
                "...",
                Style::default().fg(colors.text_muted()),
            )))
            .render(inner, buf);
            return;
        }

        let cursor_style = Style::default()
            .fg(colors.cursor_fg())
            .bg(colors.cursor_bg());
        let (before, cursor_ch, after) = self.input.render_parts();

        let line = if self.input.value().is_empty() {
            Line::from(vec![
                Span::styled(" ", cursor_style),
                Span::styled(
                    PLACEHOLDER,
                    Style::default()
                        .fg(colors.text_muted())
                        .add_modifier(Modifier::ITALIC),
                ),
            ])
        } else {
            let cursor_text = cursor_ch.map(String::from).unwrap_or_else(|| " ".to_string());
            Line::from(vec![
                Span::styled(before, Style::default().fg(colors.fg())),
                Span::styled(cursor_text, cursor_style),
                Span::styled(after, Style::default().fg(colors.fg())),
            ])
        };

        // Keep the cursor in view once the text is wider than the box
        let cursor_col = before.chars().count();
        let width = inner.width as usize;
        let offset = (cursor_col + 1).saturating_sub(width);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        Paragraph::new(line).scroll((0, offset)).render(inner, buf);
    }
}
