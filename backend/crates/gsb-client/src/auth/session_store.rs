use crate::{ClientError, ClientResult, Session};

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

/// Persists the session as JSON under a stable storage key
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session; a missing file is `None`.
    pub async fn load(&self) -> ClientResult<Option<Session>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::session_storage(self.path.clone(), e)),
        };

        let session: Session = serde_json::from_str(&contents)?;
        debug!("Loaded persisted session from {}", self.path.display());
        Ok(Some(session))
    }

    /// Write the session atomically (temp file, then rename).
    pub async fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::session_storage(parent.to_path_buf(), e))?;
        }

        let contents = serde_json::to_string_pretty(session)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(|e| ClientError::session_storage(tmp_path.clone(), e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| ClientError::session_storage(self.path.clone(), e))?;

        debug!("Persisted session to {}", self.path.display());
        Ok(())
    }

    /// Remove the persisted session; clearing an absent session succeeds.
    pub async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::session_storage(self.path.clone(), e)),
        }
    }
}
