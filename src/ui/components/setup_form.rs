use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::setup::{SetupFocus, SetupState};
use crate::ui::theme::Theme;

/// Language and level pickers for a new practice.
pub struct SetupForm<'a> {
    setup: &'a SetupState,
    theme: &'a Theme,
}

impl<'a> SetupForm<'a> {
    pub fn new(setup: &'a SetupState, theme: &'a Theme) -> Self {
        Self { setup, theme }
    }
}

impl Widget for SetupForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let focused = self.setup.focus == SetupFocus::Form;

        let block = Block::bordered()
            .title(" Start a practice ")
            .border_style(Style::default().fg(if focused {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let fields = [
            ("Language", self.setup.language().label),
            ("Level", self.setup.level().label),
        ];

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        for (i, (label, value)) in fields.iter().enumerate() {
            let is_selected = focused && i == self.setup.form_row;
            let indicator = if is_selected { " > " } else { "   " };

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let value_style = Style::default().fg(if is_selected {
                colors.accent()
            } else {
                colors.text_muted()
            });

            let lines = vec![
                Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
                Line::from(Span::styled(format!("     < {value} >"), value_style)),
            ];
            Paragraph::new(lines).render(layout[i], buf);
        }

        let action = if self.setup.is_starting() {
            Span::styled(
                "   Starting practice...",
                Style::default().fg(colors.warning()),
            )
        } else {
            Span::styled(
                "   [Enter] Start practice",
                Style::default().fg(colors.accent()),
            )
        };
        Paragraph::new(Line::from(action)).render(layout[3], buf);
    }
}
