#[cfg(feature = "network")]
pub mod http;
pub mod request;
pub mod types;

use thiserror::Error;

use crate::api::types::{PracticeRecap, SessionSummary, StartedSession};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The backend answered but reported `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("this build has no network support")]
    Offline,
}

/// The remote service that runs practice sessions.
///
/// Calls block; the UI runs them off the event loop thread.
pub trait PracticeBackend: Send + Sync {
    fn start_session(
        &self,
        user_id: &str,
        language: &str,
        level: &str,
    ) -> Result<StartedSession, ApiError>;

    /// Returns the assistant's reply, or `None` when the backend answered
    /// without one.
    fn send_message(
        &self,
        prompt: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<String>, ApiError>;

    fn fetch_summary(&self, session_id: &str) -> Result<Option<String>, ApiError>;

    fn end_session(&self, session_id: &str) -> Result<Option<PracticeRecap>, ApiError>;

    fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, ApiError>;

    /// Remove a saved practice by its listing record id.
    fn delete_session(&self, record_id: &str) -> Result<(), ApiError>;
}

/// Stand-in used when the crate is built without the `network` feature.
pub struct OfflineBackend;

impl PracticeBackend for OfflineBackend {
    fn start_session(&self, _: &str, _: &str, _: &str) -> Result<StartedSession, ApiError> {
        Err(ApiError::Offline)
    }

    fn send_message(&self, _: &str, _: &str, _: &str) -> Result<Option<String>, ApiError> {
        Err(ApiError::Offline)
    }

    fn fetch_summary(&self, _: &str) -> Result<Option<String>, ApiError> {
        Err(ApiError::Offline)
    }

    fn end_session(&self, _: &str) -> Result<Option<PracticeRecap>, ApiError> {
        Err(ApiError::Offline)
    }

    fn list_sessions(&self, _: &str) -> Result<Vec<SessionSummary>, ApiError> {
        Err(ApiError::Offline)
    }

    fn delete_session(&self, _: &str) -> Result<(), ApiError> {
        Err(ApiError::Offline)
    }
}
