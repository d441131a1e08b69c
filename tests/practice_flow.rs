use std::sync::Mutex;

use parla::api::request::{ApiOutcome, ApiReply, ApiRequest};
use parla::api::types::{
    PracticeRecap, RawSessionSummary, RecapDuration, SessionSummary, StartedSession,
};
use parla::api::{ApiError, PracticeBackend};
use parla::app::{App, AppScreen};
use parla::config::Config;
use parla::session::chat::{REPLY_PLACEHOLDER, SEND_ERROR_MESSAGE};
use parla::session::practice::{AlertKind, PracticePhase};
use parla::session::transcript::Role;
use parla::store::SessionStore;
use parla::store::schema::{SessionDescriptor, UserDescriptor};

/// Backend with canned answers that records every call it receives.
struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    start: Result<StartedSession, ApiError>,
    reply: Result<Option<String>, ApiError>,
    summary: Result<Option<String>, ApiError>,
    end: Result<Option<PracticeRecap>, ApiError>,
    sessions: Result<Vec<SessionSummary>, ApiError>,
    delete: Result<(), ApiError>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            start: Ok(StartedSession {
                session_id: "abc123".to_string(),
                initial_response: Some("Welcome! Let's begin.".to_string()),
            }),
            reply: Ok(Some("Hola! ¿Cómo estás?".to_string())),
            summary: Ok(Some("Hello again, where were we?".to_string())),
            end: Ok(Some(PracticeRecap {
                idioma: "en".to_string(),
                nivel: "B1".to_string(),
                duracion: Some(RecapDuration::Minutes(12.0)),
                total_mensajes: 4,
            })),
            sessions: Ok(Vec::new()),
            delete: Ok(()),
        }
    }
}

impl ScriptedBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PracticeBackend for ScriptedBackend {
    fn start_session(
        &self,
        user_id: &str,
        language: &str,
        level: &str,
    ) -> Result<StartedSession, ApiError> {
        self.record(format!("start {user_id} {language} {level}"));
        self.start.clone()
    }

    fn send_message(
        &self,
        prompt: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<String>, ApiError> {
        self.record(format!("chat {user_id} {session_id} {prompt}"));
        self.reply.clone()
    }

    fn fetch_summary(&self, session_id: &str) -> Result<Option<String>, ApiError> {
        self.record(format!("summary {session_id}"));
        self.summary.clone()
    }

    fn end_session(&self, session_id: &str) -> Result<Option<PracticeRecap>, ApiError> {
        self.record(format!("end {session_id}"));
        self.end.clone()
    }

    fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, ApiError> {
        self.record(format!("list {user_id}"));
        self.sessions.clone()
    }

    fn delete_session(&self, record_id: &str) -> Result<(), ApiError> {
        self.record(format!("delete {record_id}"));
        self.delete.clone()
    }
}

fn user() -> UserDescriptor {
    UserDescriptor {
        id: "u1".to_string(),
        name: "Marta Ruiz".to_string(),
        email: "marta@example.com".to_string(),
    }
}

fn descriptor(id: &str, initial: Option<&str>) -> SessionDescriptor {
    SessionDescriptor {
        session_id: id.to_string(),
        language: "en".to_string(),
        level: "B1".to_string(),
        initial_response: initial.map(str::to_string),
    }
}

fn summary(id: &str) -> SessionSummary {
    SessionSummary {
        session_id: id.to_string(),
        record_id: id.to_string(),
        language: "fr".to_string(),
        level: "A1".to_string(),
        start_time: None,
    }
}

fn config() -> Config {
    Config {
        default_language: "en".to_string(),
        default_level: "B1".to_string(),
        ..Config::default()
    }
}

fn app_with(user: Option<UserDescriptor>, session: Option<SessionDescriptor>) -> App {
    let mut store = SessionStore::in_memory();
    if let Some(user) = user {
        store.set_user(&user).unwrap();
    }
    if let Some(session) = session {
        store.set_session(&session).unwrap();
    }
    App::new(config(), store)
}

/// Run every queued request to completion, including follow-ups.
fn pump(app: &mut App, backend: &ScriptedBackend) {
    loop {
        let pending = app.take_requests();
        if pending.is_empty() {
            return;
        }
        for request in pending {
            let reply = request.execute(backend);
            app.apply(reply);
        }
    }
}

fn transcript(app: &App) -> Vec<(Role, String)> {
    app.chat
        .as_ref()
        .map(|chat| {
            chat.transcript
                .messages()
                .iter()
                .map(|m| (m.role, m.content.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_no_user_shows_signed_out() {
    let mut app = app_with(None, Some(descriptor("s1", None)));
    assert_eq!(app.screen, AppScreen::SignedOut);
    assert!(app.take_requests().is_empty());
}

#[test]
fn test_user_without_session_redirects_to_setup() {
    let backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1")]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    assert_eq!(app.screen, AppScreen::Setup);
    assert!(app.chat.is_none());

    pump(&mut app, &backend);
    assert_eq!(backend.calls(), vec!["list u1"]);
    assert_eq!(app.setup.sessions.len(), 1);
}

#[test]
fn test_stored_opening_message_skips_summary_fetch() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi! Ready?"))));
    assert_eq!(app.screen, AppScreen::Chat);
    assert_eq!(app.phase, PracticePhase::Active);

    pump(&mut app, &backend);
    assert!(backend.calls().is_empty());
    assert_eq!(
        transcript(&app),
        vec![(Role::Assistant, "Hi! Ready?".to_string())]
    );
}

#[test]
fn test_resumed_session_fetches_opening_message() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", None)));

    pump(&mut app, &backend);
    assert_eq!(backend.calls(), vec!["summary s1"]);
    assert_eq!(
        transcript(&app),
        vec![(Role::Assistant, "Hello again, where were we?".to_string())]
    );
}

#[test]
fn test_failed_summary_leaves_transcript_empty() {
    let backend = ScriptedBackend {
        summary: Err(ApiError::Status(500)),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), Some(descriptor("s1", None)));

    pump(&mut app, &backend);
    assert!(transcript(&app).is_empty());
    assert!(app.alert.is_none());
}

#[test]
fn test_blank_input_sends_nothing() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.chat.as_mut().unwrap().input.insert_str("    ");
    app.submit_message();
    assert!(app.take_requests().is_empty());
    assert_eq!(transcript(&app).len(), 1);
}

#[test]
fn test_message_round_trip_keeps_order_and_locks_input() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.chat.as_mut().unwrap().input.insert_str("  Hello ");
    app.submit_message();

    let chat = app.chat.as_mut().unwrap();
    assert!(chat.is_loading());
    assert!(chat.input.value().is_empty());

    // A second send while waiting is ignored
    chat.input.insert_str("again");
    app.submit_message();

    let pending = app.take_requests();
    assert_eq!(pending.len(), 1);
    assert_eq!(
        pending[0].request,
        ApiRequest::SendMessage {
            prompt: "Hello".to_string(),
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
        }
    );
    app.apply(pending[0].execute(&backend));

    assert_eq!(
        transcript(&app),
        vec![
            (Role::Assistant, "Hi".to_string()),
            (Role::User, "Hello".to_string()),
            (Role::Assistant, "Hola! ¿Cómo estás?".to_string()),
        ]
    );
    assert!(!app.chat.as_ref().unwrap().is_loading());
}

#[test]
fn test_failed_send_appends_error_message() {
    let backend = ScriptedBackend {
        reply: Err(ApiError::Transport("connection refused".to_string())),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.chat.as_mut().unwrap().input.insert_str("Hello");
    app.submit_message();
    pump(&mut app, &backend);

    let messages = transcript(&app);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2], (Role::Assistant, SEND_ERROR_MESSAGE.to_string()));
    assert!(!app.chat.as_ref().unwrap().is_loading());
}

#[test]
fn test_missing_reply_uses_placeholder() {
    let backend = ScriptedBackend {
        reply: Ok(None),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.chat.as_mut().unwrap().input.insert_str("Hello");
    app.submit_message();
    pump(&mut app, &backend);

    assert_eq!(
        transcript(&app).last().cloned(),
        Some((Role::Assistant, REPLY_PLACEHOLDER.to_string()))
    );
}

#[test]
fn test_stale_reply_is_dropped() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.apply(ApiReply {
        ticket: 999,
        outcome: ApiOutcome::Replied(Ok(Some("late".to_string()))),
    });
    assert_eq!(transcript(&app).len(), 1);
}

#[test]
fn test_start_practice_stores_session_and_opens_chat() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.start_practice();
    assert_eq!(app.phase, PracticePhase::Starting);
    // Enter again while starting does nothing
    app.start_practice();
    pump(&mut app, &backend);

    assert_eq!(backend.calls(), vec!["list u1", "start u1 en B1"]);
    assert_eq!(app.screen, AppScreen::Chat);
    assert_eq!(app.phase, PracticePhase::Active);

    let stored = app.store().session().unwrap();
    assert_eq!(stored.session_id, "abc123");
    assert_eq!(stored.language, "en");
    assert_eq!(stored.level, "B1");
    assert_eq!(
        transcript(&app),
        vec![(Role::Assistant, "Welcome! Let's begin.".to_string())]
    );
}

#[test]
fn test_failed_start_shows_alert_and_stays_on_setup() {
    let backend = ScriptedBackend {
        start: Err(ApiError::Rejected("Invalid level".to_string())),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.start_practice();
    pump(&mut app, &backend);

    assert_eq!(app.screen, AppScreen::Setup);
    assert_eq!(app.phase, PracticePhase::NoSession);
    assert!(app.store().session().is_none());
    assert!(!app.setup.is_starting());
    let alert = app.alert.as_ref().unwrap();
    assert_eq!(alert.kind, AlertKind::Error);
    assert!(alert.lines.iter().any(|l| l.contains("Invalid level")));
}

#[test]
fn test_start_without_user_id_alerts() {
    let mut app = app_with(
        Some(UserDescriptor {
            id: "  ".to_string(),
            name: "Nobody".to_string(),
            email: String::new(),
        }),
        None,
    );
    app.start_practice();
    assert!(app.take_requests().is_empty());
    assert!(app.alert.is_some());
}

#[test]
fn test_close_practice_clears_store_and_shows_recap() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.close_practice();
    assert!(app.store().session().is_none());
    assert_eq!(app.screen, AppScreen::Setup);
    assert_eq!(app.phase, PracticePhase::Ending);

    pump(&mut app, &backend);
    assert!(backend.calls().contains(&"end s1".to_string()));
    assert_eq!(app.phase, PracticePhase::NoSession);
    let alert = app.alert.as_ref().unwrap();
    assert_eq!(alert.kind, AlertKind::Info);
    assert!(alert.lines.iter().any(|l| l.contains("12 min")));
    assert!(alert.lines.iter().any(|l| l.contains("Messages: 4")));
}

#[test]
fn test_failed_close_still_clears_store() {
    let backend = ScriptedBackend {
        end: Err(ApiError::Status(503)),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.close_practice();
    pump(&mut app, &backend);

    assert!(app.store().session().is_none());
    assert!(app.store().user().is_some());
    assert_eq!(app.screen, AppScreen::Setup);
    assert_eq!(app.alert.as_ref().unwrap().kind, AlertKind::Error);
}

#[test]
fn test_declined_delete_sends_nothing() {
    let backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1"), summary("old2")]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.setup.toggle_focus();
    app.request_delete();
    assert_eq!(app.setup.confirm_delete.as_deref(), Some("old1"));
    app.answer_delete(false);

    assert!(app.setup.confirm_delete.is_none());
    assert!(app.take_requests().is_empty());
    assert_eq!(app.setup.sessions.len(), 2);
}

#[test]
fn test_confirmed_delete_removes_entry() {
    let backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1"), summary("old2")]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.setup.toggle_focus();
    app.setup.next_row();
    app.request_delete();
    app.answer_delete(true);
    pump(&mut app, &backend);

    assert!(backend.calls().contains(&"delete old2".to_string()));
    let ids: Vec<&str> = app
        .setup
        .sessions
        .iter()
        .map(|s| s.session_id.as_str())
        .collect();
    assert_eq!(ids, vec!["old1"]);
}

#[test]
fn test_failed_delete_keeps_entry_and_alerts() {
    let backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1")]),
        delete: Err(ApiError::Status(404)),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.setup.toggle_focus();
    app.request_delete();
    app.answer_delete(true);
    pump(&mut app, &backend);

    assert_eq!(app.setup.sessions.len(), 1);
    assert_eq!(app.alert.as_ref().unwrap().kind, AlertKind::Error);
}

#[test]
fn test_continue_saved_session_resumes_chat() {
    let backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1")]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.setup.toggle_focus();
    app.continue_selected();
    assert_eq!(app.screen, AppScreen::Chat);
    assert_eq!(app.store().session().unwrap().session_id, "old1");

    pump(&mut app, &backend);
    assert!(backend.calls().contains(&"summary old1".to_string()));
    assert_eq!(app.chat.as_ref().unwrap().title(), "Practice in FR - Level A1");
}

#[test]
fn test_logout_clears_everything() {
    let backend = ScriptedBackend::default();
    let mut app = app_with(Some(user()), Some(descriptor("s1", Some("Hi"))));
    pump(&mut app, &backend);

    app.logout();
    assert_eq!(app.screen, AppScreen::SignedOut);
    assert!(app.store().user().is_none());
    assert!(app.store().session().is_none());
    assert!(app.chat.is_none());
}

#[test]
fn test_delete_targets_record_id_not_session_id() {
    let raw: RawSessionSummary = serde_json::from_str(
        r#"{"_id": "doc42", "sessionId": "sess7", "idioma": "en", "nivel": "B1"}"#,
    )
    .unwrap();
    let backend = ScriptedBackend {
        sessions: Ok(vec![raw.into_summary().unwrap(), summary("other")]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.setup.toggle_focus();
    app.request_delete();
    app.answer_delete(true);

    let pending = app.take_requests();
    assert_eq!(
        pending[0].request,
        ApiRequest::DeleteSession {
            record_id: "doc42".to_string(),
        }
    );
    app.apply(pending[0].execute(&backend));

    let ids: Vec<&str> = app
        .setup
        .sessions
        .iter()
        .map(|s| s.session_id.as_str())
        .collect();
    assert_eq!(ids, vec!["other"]);
}

#[test]
fn test_continue_resumes_with_session_id() {
    let raw: RawSessionSummary = serde_json::from_str(
        r#"{"_id": "doc42", "sessionId": "sess7", "idioma": "en", "nivel": "B1"}"#,
    )
    .unwrap();
    let backend = ScriptedBackend {
        sessions: Ok(vec![raw.into_summary().unwrap()]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.setup.toggle_focus();
    app.continue_selected();
    pump(&mut app, &backend);

    assert_eq!(app.store().session().unwrap().session_id, "sess7");
    assert!(backend.calls().contains(&"summary sess7".to_string()));
}

#[test]
fn test_late_start_reply_does_not_replace_continued_session() {
    let backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1")]),
        start: Ok(StartedSession {
            session_id: "new9".to_string(),
            initial_response: None,
        }),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);

    app.start_practice();
    let start = app.take_requests();
    assert_eq!(start.len(), 1);

    app.setup.toggle_focus();
    app.continue_selected();
    assert_eq!(app.store().session().unwrap().session_id, "old1");

    app.apply(start[0].execute(&backend));
    pump(&mut app, &backend);

    assert_eq!(app.store().session().unwrap().session_id, "old1");
    assert_eq!(app.chat.as_ref().unwrap().session.session_id, "old1");
    assert_eq!(app.screen, AppScreen::Chat);
    assert_eq!(app.phase, PracticePhase::Active);
    assert!(!app.setup.is_starting());
}

#[test]
fn test_failed_session_list_leaves_list_empty() {
    let mut backend = ScriptedBackend {
        sessions: Ok(vec![summary("old1"), summary("old2")]),
        ..ScriptedBackend::default()
    };
    let mut app = app_with(Some(user()), None);
    pump(&mut app, &backend);
    assert_eq!(app.setup.sessions.len(), 2);

    backend.sessions = Err(ApiError::Status(500));
    app.refresh_sessions();
    assert!(app.setup.sessions.is_empty());
    pump(&mut app, &backend);

    assert!(app.setup.sessions.is_empty());
    assert!(app.setup.awaiting_list.is_none());
    assert!(app.alert.is_none());

    app.setup.toggle_focus();
    app.continue_selected();
    app.request_delete();
    assert_eq!(app.screen, AppScreen::Setup);
    assert!(app.setup.confirm_delete.is_none());
    assert!(app.take_requests().is_empty());
}
