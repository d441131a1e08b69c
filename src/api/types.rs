//! Wire shapes for the practice backend. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::session::timefmt::Timestamp;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest<'a> {
    pub user_id: &'a str,
    pub idioma: &'a str,
    pub nivel: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    #[serde(default)]
    pub success: bool,
    pub session_id: Option<String>,
    pub initial_response: Option<String>,
    pub message: Option<String>,
}

/// A session the backend confirmed as created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartedSession {
    pub session_id: String,
    pub initial_response: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest<'a> {
    pub prompt: &'a str,
    pub user_id: &'a str,
    pub session_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    pub response: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(default)]
    pub success: bool,
    pub initial_response: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndResponse {
    #[serde(default)]
    pub success: bool,
    pub resumen: Option<PracticeRecap>,
}

/// Totals the backend computes when a practice is finalized.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecap {
    #[serde(default)]
    pub idioma: String,
    #[serde(default)]
    pub nivel: String,
    pub duracion: Option<RecapDuration>,
    #[serde(default)]
    pub total_mensajes: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecapDuration {
    Minutes(f64),
    Text(String),
}

impl RecapDuration {
    pub fn display(&self) -> String {
        match self {
            RecapDuration::Minutes(m) if m.fract() == 0.0 => format!("{m:.0} min"),
            RecapDuration::Minutes(m) => format!("{m:.1} min"),
            RecapDuration::Text(t) => t.clone(),
        }
    }
}

/// A saved session as listed on the setup screen.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Chat session id, used to resume and to fetch the opening message.
    pub session_id: String,
    /// Listing record id, used to delete. Same as `session_id` when the
    /// backend sends only one of them.
    pub record_id: String,
    pub language: String,
    pub level: String,
    pub start_time: Option<Timestamp>,
}

/// List entries come from a document store that sends the record's own `_id`
/// and the chat `sessionId`, either of which may be missing. Every alias is
/// optional and resolved afterwards.
#[derive(Debug, Default, Deserialize)]
pub struct RawSessionSummary {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    #[serde(rename = "_id")]
    doc_id: Option<String>,
    idioma: Option<String>,
    language: Option<String>,
    nivel: Option<String>,
    level: Option<String>,
    #[serde(rename = "tiempoInicio")]
    tiempo_inicio: Option<Timestamp>,
    #[serde(rename = "startTime")]
    start_time: Option<Timestamp>,
}

impl RawSessionSummary {
    pub fn into_summary(self) -> Option<SessionSummary> {
        let session_id = self.session_id.filter(|id| !id.trim().is_empty());
        let doc_id = self.doc_id.filter(|id| !id.trim().is_empty());
        let (session_id, record_id) = match (session_id, doc_id) {
            (Some(session_id), Some(doc_id)) => (session_id, doc_id),
            (Some(id), None) | (None, Some(id)) => (id.clone(), id),
            (None, None) => return None,
        };
        Some(SessionSummary {
            session_id,
            record_id,
            language: self.idioma.or(self.language).unwrap_or_default(),
            level: self.nivel.or(self.level).unwrap_or_default(),
            start_time: self.tiempo_inicio.or(self.start_time),
        })
    }
}
