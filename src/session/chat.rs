use crate::api::ApiError;
use crate::api::request::Ticket;
use crate::session::transcript::{Role, Transcript};
use crate::store::schema::{SessionDescriptor, UserDescriptor};
use crate::ui::line_input::LineInput;

pub const REPLY_PLACEHOLDER: &str = "Sorry, I don't have an answer right now.";
pub const SEND_ERROR_MESSAGE: &str = "Error processing your message. Please try again.";

/// State of the chat screen for one active practice session.
pub struct ChatState {
    pub user: UserDescriptor,
    pub session: SessionDescriptor,
    pub transcript: Transcript,
    pub input: LineInput,
    /// Ticket of the in-flight message; input is locked while set.
    pub awaiting_reply: Option<Ticket>,
    pub awaiting_summary: Option<Ticket>,
}

impl ChatState {
    pub fn new(user: UserDescriptor, session: SessionDescriptor, max_input_chars: usize) -> Self {
        Self {
            user,
            session,
            transcript: Transcript::new(),
            input: LineInput::new(max_input_chars),
            awaiting_reply: None,
            awaiting_summary: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.awaiting_reply.is_some()
    }

    pub fn can_send(&self) -> bool {
        !self.is_loading() && !self.input.is_blank()
    }

    /// Move the trimmed input into the transcript as a user turn and return
    /// it. `None` (and no change) when the input is blank or a reply is
    /// still pending.
    pub fn take_prompt(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let prompt = self.input.value().trim().to_string();
        self.transcript.push(Role::User, prompt.clone());
        self.input.clear();
        Some(prompt)
    }

    /// Apply the outcome of a send. Returns false for a reply nobody is
    /// waiting for, which is dropped.
    pub fn accept_reply(&mut self, ticket: Ticket, result: Result<Option<String>, ApiError>) -> bool {
        if self.awaiting_reply != Some(ticket) {
            return false;
        }
        self.awaiting_reply = None;

        match result {
            Ok(reply) => {
                let content = reply
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| REPLY_PLACEHOLDER.to_string());
                self.transcript.push(Role::Assistant, content);
            }
            Err(err) => {
                tracing::error!(session_id = %self.session.session_id, error = %err, "message send failed");
                self.transcript.push(Role::Assistant, SEND_ERROR_MESSAGE);
            }
        }
        true
    }

    /// Seed the transcript with the session's opening message. Only applies
    /// while the transcript is still empty; failures leave it empty.
    pub fn accept_summary(&mut self, ticket: Ticket, result: Result<Option<String>, ApiError>) -> bool {
        if self.awaiting_summary != Some(ticket) {
            return false;
        }
        self.awaiting_summary = None;

        match result {
            Ok(Some(initial)) if !initial.trim().is_empty() => {
                if self.transcript.is_empty() {
                    self.transcript.push(Role::Assistant, initial);
                }
            }
            Ok(_) => {
                tracing::debug!(session_id = %self.session.session_id, "session has no opening message");
            }
            Err(err) => {
                tracing::warn!(session_id = %self.session.session_id, error = %err, "could not load session summary");
            }
        }
        true
    }

    pub fn title(&self) -> String {
        format!(
            "Practice in {} - Level {}",
            self.session.language.to_uppercase(),
            self.session.level
        )
    }

    pub fn greeting(&self) -> String {
        match self.user.first_name() {
            "" => "Hi, ready to practice?".to_string(),
            name => format!("Hi {name}, ready to practice?"),
        }
    }
}
