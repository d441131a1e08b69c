use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::catalog::{self, LANGUAGES, LEVELS};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_language() -> String {
    "es".to_string()
}
fn default_level() -> String {
    "A1".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_input_chars() -> usize {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            theme: default_theme(),
            default_language: default_language(),
            default_level: default_level(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parla")
            .join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Bring hand-edited values back into range.
    pub fn validate(&mut self) {
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if self.api_base_url.is_empty() {
            self.api_base_url = default_api_base_url();
        }
        match catalog::index_of(LANGUAGES, &self.default_language) {
            Some(idx) => self.default_language = LANGUAGES[idx].code.to_string(),
            None => self.default_language = default_language(),
        }
        match catalog::index_of(LEVELS, &self.default_level) {
            Some(idx) => self.default_level = LEVELS[idx].code.to_string(),
            None => self.default_level = default_level(),
        }
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
        self.max_input_chars = self.max_input_chars.clamp(1, 2000);
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }
}
