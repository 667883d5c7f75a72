//! # Filesystem-backed session storage
//!
//! [`FileSessionStore`] keeps the token and profile in a single JSON document so they
//! are always replaced or removed together.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── session.json       # {"token": "...", "user": {"id", "username", "email"}}
//! └── session.json.tmp   # transient, renamed over session.json on save
//! ```
//!
//! Saves write the temporary file first and rename it into place, so a crash mid-write
//! leaves either the old session or the new one, never half of each.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::session::{ChangeNotifier, SessionStorage, StorageError, StoredSession};

const SESSION_FILE: &str = "session.json";

/// Filesystem-backed SessionStorage for desktop and mobile persistence.
#[derive(Debug)]
pub struct FileSessionStore {
    base: PathBuf,
    changes: ChangeNotifier,
}

impl FileSessionStore {
    pub fn new(base: PathBuf) -> Self {
        Self {
            base,
            changes: ChangeNotifier::default(),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.base.join(SESSION_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.base.join(format!("{SESSION_FILE}.tmp"))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStore {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let bytes = match tokio::fs::read(self.session_path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(StorageError::Corrupt)
    }

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(session).map_err(StorageError::Encode)?;
        tokio::fs::create_dir_all(&self.base).await?;
        tokio::fs::write(self.temp_path(), bytes).await?;
        tokio::fs::rename(self.temp_path(), self.session_path()).await?;
        tracing::debug!(path = %self.session_path().display(), "session saved");
        self.changes.notify();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.session_path()).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(path = %self.session_path().display(), "session cleared");
        self.changes.notify();
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::UserInfo;

    fn session(token: &str) -> StoredSession {
        StoredSession {
            token: token.to_string(),
            user: UserInfo {
                id: 7,
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileSessionStore::new(dir.path().join("nested"));
        store.save(&session("first")).await.unwrap();
        store.save(&session("second")).await.unwrap();

        // Re-open from same directory
        let reopened = FileSessionStore::new(dir.path().join("nested"));
        assert_eq!(reopened.load().await.unwrap(), Some(session("second")));
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf());

        // Clearing when nothing is stored is fine
        store.clear().await.unwrap();

        store.save(&session("token")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), b"{not json").unwrap();

        let store = FileSessionStore::new(dir.path().to_path_buf());
        assert!(matches!(store.load().await, Err(StorageError::Corrupt(_))));
    }
}
