use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::api::PracticeBackend;
use crate::api::request::{ApiReply, PendingRequest};

pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
    Api(ApiReply),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let app_event = match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        Ok(Event::Paste(text)) => AppEvent::Paste(text),
                        Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                        _ => continue,
                    };
                    if input_tx.send(app_event).is_err() {
                        return;
                    }
                } else if input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Run `pending` on its own thread; the reply comes back through `next`.
    pub fn dispatch(&self, backend: Arc<dyn PracticeBackend>, pending: PendingRequest) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            tracing::debug!(ticket = pending.ticket, request = ?pending.request, "dispatching");
            let reply = pending.execute(backend.as_ref());
            // The receiver is gone once the UI has quit
            let _ = tx.send(AppEvent::Api(reply));
        });
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
