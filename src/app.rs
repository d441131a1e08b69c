use crate::api::ApiError;
use crate::api::request::{ApiOutcome, ApiReply, ApiRequest, PendingRequest, Ticket};
use crate::api::types::{PracticeRecap, SessionSummary, StartedSession};
use crate::config::Config;
use crate::session::chat::ChatState;
use crate::session::gate::{EntryState, resolve_entry};
use crate::session::practice::{Alert, PracticePhase};
use crate::session::setup::{PendingStart, SetupState};
use crate::session::transcript::Role;
use crate::store::SessionStore;
use crate::store::schema::{SessionDescriptor, UserDescriptor};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    SignedOut,
    Setup,
    Chat,
}

pub struct App {
    pub screen: AppScreen,
    pub phase: PracticePhase,
    pub theme: &'static Theme,
    pub config: Config,
    pub user: Option<UserDescriptor>,
    pub setup: SetupState,
    pub chat: Option<ChatState>,
    pub alert: Option<Alert>,
    pub should_quit: bool,
    store: SessionStore,
    outbox: Vec<PendingRequest>,
    last_ticket: Ticket,
    closing: Option<Ticket>,
}

impl App {
    /// Build the app and route to the furthest screen the stored
    /// descriptors allow: Chat, else Setup, else SignedOut.
    pub fn new(config: Config, store: SessionStore) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(
                theme = %config.theme,
                available = %Theme::available_themes().join(", "),
                "unknown theme, using default"
            );
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let setup = SetupState::new(&config);

        let mut app = Self {
            screen: AppScreen::SignedOut,
            phase: PracticePhase::NoSession,
            theme,
            config,
            user: None,
            setup,
            chat: None,
            alert: None,
            should_quit: false,
            store,
            outbox: Vec::new(),
            last_ticket: 0,
            closing: None,
        };
        app.enter(AppScreen::Chat);
        app
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Requests queued since the last call, in issue order.
    pub fn take_requests(&mut self) -> Vec<PendingRequest> {
        std::mem::take(&mut self.outbox)
    }

    fn queue(&mut self, request: ApiRequest) -> Ticket {
        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.outbox.push(PendingRequest { ticket, request });
        ticket
    }

    /// Show `target`, following redirects when the store lacks what it needs.
    pub fn enter(&mut self, target: AppScreen) {
        if target == AppScreen::SignedOut {
            self.show_signed_out();
            return;
        }
        match resolve_entry(target, self.store.user(), self.store.session()) {
            EntryState::Redirect(route) => {
                tracing::debug!(?target, ?route, "redirecting");
                self.enter(route);
            }
            EntryState::Ready { user, session } => match (target, session) {
                (AppScreen::Chat, Some(session)) => self.show_chat(user, session),
                _ => self.show_setup(user),
            },
        }
    }

    fn show_signed_out(&mut self) {
        self.user = None;
        self.chat = None;
        self.setup.sessions.clear();
        self.setup.confirm_delete = None;
        self.setup.awaiting_list = None;
        self.screen = AppScreen::SignedOut;
    }

    fn show_setup(&mut self, user: UserDescriptor) {
        self.chat = None;
        self.setup.confirm_delete = None;
        let user_id = user.id.trim().to_string();
        self.user = Some(user);
        self.screen = AppScreen::Setup;
        // Entries from an earlier listing must not outlive a failed reload
        self.setup.set_sessions(Vec::new());
        if !user_id.is_empty() {
            let ticket = self.queue(ApiRequest::ListSessions { user_id });
            self.setup.awaiting_list = Some(ticket);
        }
    }

    fn show_chat(&mut self, user: UserDescriptor, session: SessionDescriptor) {
        let mut chat = ChatState::new(user.clone(), session, self.config.max_input_chars);

        let opening = chat
            .session
            .initial_response
            .clone()
            .filter(|r| !r.trim().is_empty());
        if let Some(opening) = opening {
            chat.transcript.push(Role::Assistant, opening);
        } else if !chat.session.session_id.trim().is_empty() {
            let session_id = chat.session.session_id.clone();
            chat.awaiting_summary = Some(self.queue(ApiRequest::FetchSummary { session_id }));
        }

        tracing::info!(session_id = %chat.session.session_id, "practice active");
        self.user = Some(user);
        self.chat = Some(chat);
        self.phase = PracticePhase::Active;
        self.screen = AppScreen::Chat;
    }

    pub fn refresh_sessions(&mut self) {
        if self.screen != AppScreen::Setup {
            return;
        }
        if let Some(user) = self.user.clone() {
            self.show_setup(user);
        }
    }

    pub fn start_practice(&mut self) {
        if self.setup.is_starting() {
            return;
        }
        let user_id = self
            .user
            .as_ref()
            .map(|u| u.id.trim().to_string())
            .filter(|id| !id.is_empty());
        let Some(user_id) = user_id else {
            self.alert = Some(Alert::error(
                "Cannot start practice",
                vec!["No signed-in user. Run `parla login` first.".to_string()],
            ));
            return;
        };

        let language = self.setup.language().code.to_string();
        let level = self.setup.level().code.to_string();
        let ticket = self.queue(ApiRequest::StartSession {
            user_id,
            language: language.clone(),
            level: level.clone(),
        });
        self.setup.starting = Some(PendingStart {
            ticket,
            language,
            level,
        });
        self.phase = PracticePhase::Starting;
    }

    /// Resume the highlighted saved session without asking the backend.
    /// A start still in flight is abandoned; its reply will be dropped.
    pub fn continue_selected(&mut self) {
        let Some(summary) = self.setup.selected_session().cloned() else {
            return;
        };
        if let Some(pending) = self.setup.starting.take() {
            tracing::debug!(ticket = pending.ticket, "abandoning pending start");
        }
        let descriptor = SessionDescriptor {
            session_id: summary.session_id,
            language: summary.language,
            level: summary.level,
            initial_response: None,
        };
        if let Err(err) = self.store.set_session(&descriptor) {
            tracing::error!(error = %err, "could not save practice session");
            self.phase = PracticePhase::NoSession;
            self.alert = Some(Alert::error("Cannot continue practice", vec![err.to_string()]));
            return;
        }
        self.enter(AppScreen::Chat);
    }

    /// Ask for confirmation before deleting the highlighted saved session.
    pub fn request_delete(&mut self) {
        if let Some(summary) = self.setup.selected_session() {
            self.setup.confirm_delete = Some(summary.record_id.clone());
        }
    }

    pub fn answer_delete(&mut self, confirmed: bool) {
        let Some(record_id) = self.setup.confirm_delete.take() else {
            return;
        };
        if confirmed {
            self.queue(ApiRequest::DeleteSession { record_id });
        }
    }

    pub fn submit_message(&mut self) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        let Some(prompt) = chat.take_prompt() else {
            return;
        };
        let request = ApiRequest::SendMessage {
            prompt,
            user_id: chat.user.id.clone(),
            session_id: chat.session.session_id.clone(),
        };
        let ticket = self.queue(request);
        if let Some(chat) = self.chat.as_mut() {
            chat.awaiting_reply = Some(ticket);
        }
    }

    /// Tear down the active practice. The local descriptor goes first so the
    /// teardown holds whatever the finalize call does.
    pub fn close_practice(&mut self) {
        let Some(chat) = self.chat.take() else {
            return;
        };
        if let Err(err) = self.store.clear_session() {
            tracing::error!(error = %err, "could not clear practice session");
        }

        let session_id = chat.session.session_id;
        if session_id.trim().is_empty() {
            self.phase = PracticePhase::NoSession;
        } else {
            self.closing = Some(self.queue(ApiRequest::EndSession { session_id }));
            self.phase = PracticePhase::Ending;
        }
        self.enter(AppScreen::Setup);
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear_session() {
            tracing::error!(error = %err, "could not clear practice session");
        }
        if let Err(err) = self.store.clear_user() {
            tracing::error!(error = %err, "could not clear user");
        }
        self.setup.starting = None;
        self.phase = PracticePhase::NoSession;
        self.enter(AppScreen::SignedOut);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn apply(&mut self, reply: ApiReply) {
        let ApiReply { ticket, outcome } = reply;
        match outcome {
            ApiOutcome::Started(result) => self.on_started(ticket, result),
            ApiOutcome::Replied(result) => {
                let applied = self
                    .chat
                    .as_mut()
                    .is_some_and(|chat| chat.accept_reply(ticket, result));
                if !applied {
                    tracing::debug!(ticket, "dropping stale chat reply");
                }
            }
            ApiOutcome::Summary(result) => {
                let applied = self
                    .chat
                    .as_mut()
                    .is_some_and(|chat| chat.accept_summary(ticket, result));
                if !applied {
                    tracing::debug!(ticket, "dropping stale session summary");
                }
            }
            ApiOutcome::Ended(result) => self.on_ended(ticket, result),
            ApiOutcome::Sessions(result) => self.on_sessions(ticket, result),
            ApiOutcome::Deleted { record_id, result } => self.on_deleted(&record_id, result),
        }
    }

    fn on_started(&mut self, ticket: Ticket, result: Result<StartedSession, ApiError>) {
        let pending = match self.setup.starting.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.setup.starting = other;
                tracing::debug!(ticket, "dropping stale start reply");
                return;
            }
        };

        let started = match result {
            Ok(started) => started,
            Err(err) => {
                tracing::error!(error = %err, "could not start practice");
                self.phase = PracticePhase::NoSession;
                self.alert = Some(Alert::error(
                    "Could not start the practice",
                    vec![err.to_string()],
                ));
                return;
            }
        };

        let descriptor = SessionDescriptor {
            session_id: started.session_id,
            language: pending.language,
            level: pending.level,
            initial_response: started.initial_response,
        };
        if let Err(err) = self.store.set_session(&descriptor) {
            tracing::error!(error = %err, "could not save practice session");
            self.phase = PracticePhase::NoSession;
            self.alert = Some(Alert::error(
                "Could not start the practice",
                vec![err.to_string()],
            ));
            return;
        }
        tracing::info!(session_id = %descriptor.session_id, "practice started");
        self.enter(AppScreen::Chat);
    }

    fn on_ended(&mut self, ticket: Ticket, result: Result<Option<PracticeRecap>, ApiError>) {
        if self.closing != Some(ticket) {
            tracing::debug!(ticket, "dropping stale finalize reply");
            return;
        }
        self.closing = None;
        if self.phase == PracticePhase::Ending {
            self.phase = PracticePhase::NoSession;
        }

        self.alert = Some(match result {
            Ok(recap) => Alert::practice_finished(recap.as_ref()),
            Err(err) => {
                tracing::warn!(error = %err, "could not finalize practice");
                Alert::error(
                    "Practice closed",
                    vec!["The practice could not be finalized on the server.".to_string()],
                )
            }
        });
    }

    fn on_sessions(&mut self, ticket: Ticket, result: Result<Vec<SessionSummary>, ApiError>) {
        if self.setup.awaiting_list != Some(ticket) {
            tracing::debug!(ticket, "dropping stale session list");
            return;
        }
        self.setup.awaiting_list = None;
        match result {
            Ok(sessions) => self.setup.set_sessions(sessions),
            Err(err) => {
                tracing::warn!(error = %err, "could not load saved sessions");
                self.setup.set_sessions(Vec::new());
            }
        }
    }

    fn on_deleted(&mut self, record_id: &str, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.setup.remove_session(record_id);
            }
            Err(err) => {
                tracing::error!(record_id, error = %err, "could not delete session");
                self.alert = Some(Alert::error(
                    "Could not delete the practice",
                    vec![err.to_string()],
                ));
            }
        }
    }
}
