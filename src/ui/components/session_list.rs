use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::api::types::SessionSummary;
use crate::session::catalog::{self, LEVELS};
use crate::session::setup::{SetupFocus, SetupState};
use crate::session::timefmt;
use crate::ui::theme::Theme;

/// Saved practices the user can continue or delete.
pub struct SessionList<'a> {
    setup: &'a SetupState,
    theme: &'a Theme,
}

impl<'a> SessionList<'a> {
    pub fn new(setup: &'a SetupState, theme: &'a Theme) -> Self {
        Self { setup, theme }
    }
}

fn started_label(summary: &SessionSummary) -> String {
    match &summary.start_time {
        Some(ts) => format!("Started: {}", timefmt::format_date_time(ts)),
        None => "Started: unknown".to_string(),
    }
}

impl Widget for SessionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let focused = self.setup.focus == SetupFocus::Sessions;

        let title = if self.setup.awaiting_list.is_some() {
            " My practices (loading) "
        } else {
            " My practices "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if focused {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.setup.sessions.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  You have no saved practices.",
                Style::default().fg(colors.text_muted()),
            )))
            .render(inner, buf);
            return;
        }

        // Two rows per entry; keep the selection on screen
        let visible = (inner.height as usize / 2).max(1);
        let first = (self.setup.selected + 1).saturating_sub(visible);

        let mut lines: Vec<Line> = Vec::new();
        for (i, summary) in self.setup.sessions.iter().enumerate().skip(first).take(visible) {
            let is_selected = focused && i == self.setup.selected;
            let indicator = if is_selected { " > " } else { "   " };
            let row_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            lines.push(Line::from(Span::styled(
                format!(
                    "{indicator}{} - {}",
                    summary.language.to_uppercase(),
                    catalog::label_for(LEVELS, &summary.level)
                ),
                row_style,
            )));
            lines.push(Line::from(Span::styled(
                format!("     {}", started_label(summary)),
                Style::default().fg(colors.text_muted()),
            )));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
