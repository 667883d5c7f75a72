use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use crate::session::{ChangeNotifier, SessionStorage, StorageError, StoredSession};

/// In-memory SessionStorage for testing.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
    changes: ChangeNotifier,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStore {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        *self.session.lock().await = Some(session.clone());
        self.changes.notify();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.session.lock().await = None;
        self.changes.notify();
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
