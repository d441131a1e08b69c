use chrono::{DateTime, Local};

use crate::session::timefmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub display_time: String,
}

/// Append-only list of chat turns. Ids come from the creation time in
/// milliseconds and are bumped past the previous id when the clock has not
/// moved, so they are unique and strictly increasing.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    last_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &ChatMessage {
        self.push_at(role, content, Local::now())
    }

    pub fn push_at(
        &mut self,
        role: Role,
        content: impl Into<String>,
        at: DateTime<Local>,
    ) -> &ChatMessage {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;

        self.messages.push(ChatMessage {
            id,
            role,
            content: content.into(),
            timestamp: at,
            display_time: timefmt::format_time(&at),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
