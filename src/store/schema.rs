use serde::{Deserialize, Serialize};

/// Store key holding the signed-in user.
pub const USER_KEY: &str = "user";
/// Store key holding the active practice session.
pub const PRACTICE_KEY: &str = "practice_settings";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserDescriptor {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub session_id: String,
    pub language: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_response: Option<String>,
}
