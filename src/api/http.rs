use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::types::{
    ChatRequest, ChatResponse, EndRequest, EndResponse, PracticeRecap, RawSessionSummary,
    SessionSummary, StartRequest, StartResponse, StartedSession, SummaryResponse,
};
use crate::api::{ApiError, PracticeBackend};

/// `PracticeBackend` over the service's JSON HTTP API.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "invalid base url {base_url}: not a hierarchical url"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded `segments` to the base url path.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R, ApiError> {
        let url = self.endpoint(segments);
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().map_err(transport)?;
        decode(response)
    }

    fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<R, ApiError> {
        let url = self.endpoint(segments);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(transport)?;
        decode(response)
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Transport("timed out".to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // Error bodies usually carry `{ success: false, message }`
    let message = response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|body| body.get("message")?.as_str().map(str::to_string));
    Err(match message {
        Some(message) => ApiError::Rejected(message),
        None => ApiError::Status(status.as_u16()),
    })
}

fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    check_status(response)?
        .json::<R>()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

impl PracticeBackend for HttpBackend {
    fn start_session(
        &self,
        user_id: &str,
        language: &str,
        level: &str,
    ) -> Result<StartedSession, ApiError> {
        let body = StartRequest {
            user_id,
            idioma: language,
            nivel: level,
        };
        let resp: StartResponse =
            self.post(&["api", "chat", "practice", "start"], &body)?;
        if !resp.success {
            return Err(ApiError::Rejected(
                resp.message
                    .unwrap_or_else(|| "the practice could not be started".to_string()),
            ));
        }
        match resp.session_id.filter(|id| !id.trim().is_empty()) {
            Some(session_id) => Ok(StartedSession {
                session_id,
                initial_response: resp.initial_response,
            }),
            None => Err(ApiError::Decode("start response has no sessionId".to_string())),
        }
    }

    fn send_message(
        &self,
        prompt: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let body = ChatRequest {
            prompt,
            user_id,
            session_id,
        };
        let resp: ChatResponse = self.post(&["api", "chat", "chatbot"], &body)?;
        Ok(resp.response)
    }

    fn fetch_summary(&self, session_id: &str) -> Result<Option<String>, ApiError> {
        let resp: SummaryResponse =
            self.get(&["api", "chat", "practice", "summary", session_id])?;
        if resp.success {
            Ok(resp.initial_response)
        } else {
            Err(ApiError::Rejected("summary unavailable".to_string()))
        }
    }

    fn end_session(&self, session_id: &str) -> Result<Option<PracticeRecap>, ApiError> {
        let body = EndRequest { session_id };
        let resp: EndResponse = self.post(&["api", "chat", "practice", "end"], &body)?;
        if resp.success {
            Ok(resp.resumen)
        } else {
            Err(ApiError::Rejected("the practice could not be finalized".to_string()))
        }
    }

    fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, ApiError> {
        let raw: Vec<RawSessionSummary> = self.get(&["api", "chat", "practice", user_id])?;
        Ok(raw
            .into_iter()
            .filter_map(RawSessionSummary::into_summary)
            .collect())
    }

    fn delete_session(&self, record_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "chat", "practice", record_id]);
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().map_err(transport)?;
        check_status(response).map(|_| ())
    }
}
