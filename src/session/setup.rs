use crate::api::request::Ticket;
use crate::api::types::SessionSummary;
use crate::config::Config;
use crate::session::catalog::{self, Choice, LANGUAGES, LEVELS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupFocus {
    Form,
    Sessions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingStart {
    pub ticket: Ticket,
    pub language: String,
    pub level: String,
}

pub struct SetupState {
    pub language_idx: usize,
    pub level_idx: usize,
    /// 0 = language row, 1 = level row
    pub form_row: usize,
    pub focus: SetupFocus,
    pub sessions: Vec<SessionSummary>,
    pub selected: usize,
    /// Session id awaiting a yes/no answer before it is deleted.
    pub confirm_delete: Option<String>,
    pub awaiting_list: Option<Ticket>,
    pub starting: Option<PendingStart>,
}

impl SetupState {
    pub fn new(config: &Config) -> Self {
        Self {
            language_idx: catalog::index_of(LANGUAGES, &config.default_language).unwrap_or(0),
            level_idx: catalog::index_of(LEVELS, &config.default_level).unwrap_or(0),
            form_row: 0,
            focus: SetupFocus::Form,
            sessions: Vec::new(),
            selected: 0,
            confirm_delete: None,
            awaiting_list: None,
            starting: None,
        }
    }

    pub fn language(&self) -> &'static Choice {
        &LANGUAGES[self.language_idx % LANGUAGES.len()]
    }

    pub fn level(&self) -> &'static Choice {
        &LEVELS[self.level_idx % LEVELS.len()]
    }

    pub fn is_starting(&self) -> bool {
        self.starting.is_some()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SetupFocus::Form if !self.sessions.is_empty() => SetupFocus::Sessions,
            _ => SetupFocus::Form,
        };
    }

    pub fn next_row(&mut self) {
        match self.focus {
            SetupFocus::Form => self.form_row = (self.form_row + 1).min(1),
            SetupFocus::Sessions => {
                if !self.sessions.is_empty() {
                    self.selected = (self.selected + 1).min(self.sessions.len() - 1);
                }
            }
        }
    }

    pub fn prev_row(&mut self) {
        match self.focus {
            SetupFocus::Form => self.form_row = self.form_row.saturating_sub(1),
            SetupFocus::Sessions => self.selected = self.selected.saturating_sub(1),
        }
    }

    /// Step the focused form row through its options, wrapping around.
    pub fn cycle(&mut self, forward: bool) {
        if self.focus != SetupFocus::Form {
            return;
        }
        let (idx, len) = match self.form_row {
            0 => (&mut self.language_idx, LANGUAGES.len()),
            _ => (&mut self.level_idx, LEVELS.len()),
        };
        *idx = if forward {
            (*idx + 1) % len
        } else if *idx == 0 {
            len - 1
        } else {
            *idx - 1
        };
    }

    pub fn selected_session(&self) -> Option<&SessionSummary> {
        if self.focus != SetupFocus::Sessions {
            return None;
        }
        self.sessions.get(self.selected)
    }

    pub fn set_sessions(&mut self, sessions: Vec<SessionSummary>) {
        self.sessions = sessions;
        self.clamp_selection();
    }

    /// Drop the entry with `record_id`. Returns whether one was removed.
    pub fn remove_session(&mut self, record_id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.record_id != record_id);
        self.clamp_selection();
        self.sessions.len() != before
    }

    fn clamp_selection(&mut self) {
        if self.sessions.is_empty() {
            self.selected = 0;
            self.focus = SetupFocus::Form;
        } else {
            self.selected = self.selected.min(self.sessions.len() - 1);
        }
    }
}
