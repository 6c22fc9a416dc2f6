use crate::{ConfigError, ConfigErrorResult, DEFAULT_SESSION_DIRECTORY, DEFAULT_STORAGE_KEY};

use serde::Deserialize;

pub const MAX_STORAGE_KEY_LENGTH: usize = 64;

/// Where the signed-in session is cached between runs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stable application-specific key; the session file is `<key>.json`
    pub storage_key: String,
    /// Directory for session files, relative to the config directory
    pub dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: String::from(DEFAULT_STORAGE_KEY),
            dir: String::from(DEFAULT_SESSION_DIRECTORY),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.storage_key.is_empty() || self.storage_key.len() > MAX_STORAGE_KEY_LENGTH {
            return Err(ConfigError::session(format!(
                "session.storage_key must be 1-{} characters, got {}",
                MAX_STORAGE_KEY_LENGTH,
                self.storage_key.len()
            )));
        }

        let valid_chars = self
            .storage_key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_chars {
            return Err(ConfigError::session(format!(
                "session.storage_key may only contain letters, digits, '-' and '_', got '{}'",
                self.storage_key
            )));
        }

        let dir = std::path::Path::new(&self.dir);
        if dir.is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::session(
                "session.dir must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// File name of the persisted session
    pub fn file_name(&self) -> String {
        format!("{}.json", self.storage_key)
    }
}
