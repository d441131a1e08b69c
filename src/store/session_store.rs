use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::kv::{KeyValueStore, MemoryStore};
use crate::store::schema::{PRACTICE_KEY, SessionDescriptor, USER_KEY, UserDescriptor};

/// Typed access to the user and practice-session descriptors.
///
/// Reads never fail: a missing, unreadable or corrupt entry is reported as
/// absent, which sends the screens through their redirect path.
pub struct SessionStore {
    inner: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(inner: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn user(&self) -> Option<UserDescriptor> {
        self.load(USER_KEY)
    }

    pub fn set_user(&mut self, user: &UserDescriptor) -> Result<()> {
        self.save(USER_KEY, user)
    }

    pub fn clear_user(&mut self) -> Result<()> {
        self.inner.remove(USER_KEY)
    }

    pub fn session(&self) -> Option<SessionDescriptor> {
        self.load(PRACTICE_KEY)
    }

    /// Replaces any stored session wholesale.
    pub fn set_session(&mut self, session: &SessionDescriptor) -> Result<()> {
        self.save(PRACTICE_KEY, session)
    }

    pub fn clear_session(&mut self) -> Result<()> {
        self.inner.remove(PRACTICE_KEY)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.inner.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "could not read store entry");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring corrupt store entry");
                None
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.inner.set(key, &json)
    }
}
