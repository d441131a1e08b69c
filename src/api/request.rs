use crate::api::types::{PracticeRecap, SessionSummary, StartedSession};
use crate::api::{ApiError, PracticeBackend};

/// Monotonic id attached to every outbound request so late replies can be
/// matched against what the UI is still waiting for.
pub type Ticket = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiRequest {
    StartSession {
        user_id: String,
        language: String,
        level: String,
    },
    SendMessage {
        prompt: String,
        user_id: String,
        session_id: String,
    },
    FetchSummary {
        session_id: String,
    },
    EndSession {
        session_id: String,
    },
    ListSessions {
        user_id: String,
    },
    /// `record_id` is the listing's document id, not the chat session id.
    DeleteSession {
        record_id: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome {
    Started(Result<StartedSession, ApiError>),
    Replied(Result<Option<String>, ApiError>),
    Summary(Result<Option<String>, ApiError>),
    Ended(Result<Option<PracticeRecap>, ApiError>),
    Sessions(Result<Vec<SessionSummary>, ApiError>),
    Deleted {
        record_id: String,
        result: Result<(), ApiError>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: ApiRequest,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiReply {
    pub ticket: Ticket,
    pub outcome: ApiOutcome,
}

impl PendingRequest {
    /// Run the request to completion against `backend`.
    pub fn execute(&self, backend: &dyn PracticeBackend) -> ApiReply {
        let outcome = match &self.request {
            ApiRequest::StartSession {
                user_id,
                language,
                level,
            } => ApiOutcome::Started(backend.start_session(user_id, language, level)),
            ApiRequest::SendMessage {
                prompt,
                user_id,
                session_id,
            } => ApiOutcome::Replied(backend.send_message(prompt, user_id, session_id)),
            ApiRequest::FetchSummary { session_id } => {
                ApiOutcome::Summary(backend.fetch_summary(session_id))
            }
            ApiRequest::EndSession { session_id } => {
                ApiOutcome::Ended(backend.end_session(session_id))
            }
            ApiRequest::ListSessions { user_id } => {
                ApiOutcome::Sessions(backend.list_sessions(user_id))
            }
            ApiRequest::DeleteSession { record_id } => ApiOutcome::Deleted {
                record_id: record_id.clone(),
                result: backend.delete_session(record_id),
            },
        };
        ApiReply {
            ticket: self.ticket,
            outcome,
        }
    }
}
