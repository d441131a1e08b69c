// The binary entry point is main.rs; the module tree lives here so the
// integration tests can drive `App` against a scripted backend.

pub mod api;
pub mod app;
pub mod config;
pub mod event;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
