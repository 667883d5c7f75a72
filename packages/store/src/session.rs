use api::UserInfo;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Token and profile persisted after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted document exists but cannot be parsed.
    #[error("persisted session is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Persisted session storage shared by the auth flows (writers) and the session gate
/// (reader).
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read the persisted session, `None` when signed out.
    async fn load(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Replace the persisted session as one unit.
    async fn save(&self, session: &StoredSession) -> Result<(), StorageError>;

    /// Remove the persisted session. Removing an absent session succeeds.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Receiver that observes a new value after every `save` or `clear`.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Write counter published to storage subscribers.
#[derive(Debug)]
pub struct ChangeNotifier {
    tx: watch::Sender<u64>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self {
            tx: watch::Sender::new(0),
        }
    }
}

impl ChangeNotifier {
    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
