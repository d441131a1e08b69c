use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::session::practice::{Alert, AlertKind};
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Centered modal drawn over whatever screen is behind it.
pub struct Dialog<'a> {
    title: String,
    lines: Vec<String>,
    hint: &'a str,
    accent: Color,
    theme: &'a Theme,
}

impl<'a> Dialog<'a> {
    pub fn alert(alert: &Alert, theme: &'a Theme) -> Self {
        let accent = match alert.kind {
            AlertKind::Info => theme.colors.success(),
            AlertKind::Error => theme.colors.error(),
        };
        Self {
            title: alert.title.clone(),
            lines: alert.lines.clone(),
            hint: "[any key] Close",
            accent,
            theme,
        }
    }

    pub fn confirm(question: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title: "Confirm".to_string(),
            lines: vec![question.into()],
            hint: "[y] Yes  [n] No",
            accent: theme.colors.warning(),
            theme,
        }
    }
}

impl Widget for Dialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dialog_area = centered_rect(50, 40, area);

        Clear.render(dialog_area, buf);

        let mut lines: Vec<Line> = vec![Line::from("")];
        for line in &self.lines {
            lines.push(Line::from(Span::styled(
                line.clone(),
                Style::default().fg(colors.fg()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.hint,
            Style::default().fg(colors.text_muted()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(Span::styled(
                        format!(" {} ", self.title),
                        Style::default()
                            .fg(self.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .border_style(Style::default().fg(self.accent))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(dialog_area, buf);
    }
}
