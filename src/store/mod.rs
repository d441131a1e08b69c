pub mod json_store;
pub mod kv;
pub mod schema;
pub mod session_store;

pub use session_store::SessionStore;
