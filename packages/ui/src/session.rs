//! # Session gate
//!
//! Decides which navigation surface the app shows from one fact: whether persisted
//! storage currently holds a non-empty token.
//!
//! [`SessionGate`] is the only writer of [`SessionState`]. Screens read it through
//! [`SessionGate::subscribe`] (or the Dioxus signal the provider mirrors it into) and
//! never change it directly: sign-in flows write storage, logout clears storage, and the
//! gate notices.
//!
//! ## Reconciliation triggers
//!
//! 1. [`bootstrap`](SessionGate::bootstrap) at start-up, before the first render.
//! 2. A fixed polling interval (one second by default).
//! 3. [`AppLifecycle::Foreground`] reported through [`on_lifecycle`](SessionGate::on_lifecycle).
//! 4. Change notifications from the storage writers.
//!
//! Every trigger runs the same idempotent [`reconcile`](SessionGate::reconcile), which
//! publishes only when the derived state differs from the current one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use store::{SessionStorage, StorageError};
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;

/// Which surface the app renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Storage has not been read yet; render nothing.
    Pending,
    /// Login / Register surface.
    Unauthenticated,
    /// Dashboard surface.
    Authenticated { token: String },
}

impl SessionState {
    fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => SessionState::Authenticated { token },
            _ => SessionState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    fn label(&self) -> &'static str {
        match self {
            SessionState::Pending => "pending",
            SessionState::Unauthenticated => "no token",
            SessionState::Authenticated { .. } => "has token",
        }
    }
}

/// Application visibility transitions reported by the platform shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    Foreground,
    Background,
}

/// What caused a reconciliation, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Poll,
    Foreground,
    StorageChanged,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Startup => "startup",
            Trigger::Poll => "poll",
            Trigger::Foreground => "foreground",
            Trigger::StorageChanged => "storage changed",
        };
        f.write_str(name)
    }
}

pub struct SessionGate {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<SessionState>,
    foreground: Notify,
    poll_interval: Duration,
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state.borrow().label())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    pub fn new(storage: Arc<dyn SessionStorage>, poll_interval: Duration) -> Self {
        Self {
            storage,
            state: watch::Sender::new(SessionState::Pending),
            foreground: Notify::new(),
            poll_interval,
        }
    }

    /// Observe the rendered state. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// First read of persisted storage. Leaves the gate out of `Pending`.
    pub async fn bootstrap(&self) -> SessionState {
        self.reconcile(Trigger::Startup).await;
        self.current()
    }

    /// Report an application visibility change.
    pub fn on_lifecycle(&self, event: AppLifecycle) {
        tracing::debug!(?event, "app lifecycle changed");
        if event == AppLifecycle::Foreground {
            self.foreground.notify_one();
        }
    }

    /// Re-read the persisted token and publish the derived state if it changed.
    /// Returns whether the state changed.
    pub async fn reconcile(&self, trigger: Trigger) -> bool {
        let next = match self.read_token().await {
            Ok(token) => SessionState::from_token(token),
            Err(e) => {
                tracing::error!("Token check failed ({trigger}): {e}");
                if !self.state.borrow().is_pending() {
                    return false;
                }
                // Let the app render the sign-in surface rather than nothing
                SessionState::Unauthenticated
            }
        };

        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::info!(
                "Session state changing from {} to {} ({trigger})",
                current.label(),
                next.label()
            );
            *current = next;
            true
        })
    }

    /// Reconcile on every poll tick, storage change and foreground transition until the
    /// future is dropped.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; bootstrap covers that read
        ticker.tick().await;

        let mut changes = self.storage.subscribe();
        changes.borrow_and_update();
        let mut storage_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.reconcile(Trigger::Poll).await;
                }
                changed = changes.changed(), if storage_open => {
                    if changed.is_ok() {
                        self.reconcile(Trigger::StorageChanged).await;
                    } else {
                        storage_open = false;
                    }
                }
                _ = self.foreground.notified() => {
                    self.reconcile(Trigger::Foreground).await;
                }
            }
        }
    }

    async fn read_token(&self) -> Result<Option<String>, StorageError> {
        match self.storage.load().await {
            Ok(session) => Ok(session.map(|s| s.token)),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!("Discarding corrupt persisted session: {e}");
                self.storage.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use api::UserInfo;
    use async_trait::async_trait;
    use store::{MemorySessionStore, StoredSession};
    use tokio::sync::Mutex;

    use super::*;

    fn session(token: &str) -> StoredSession {
        StoredSession {
            token: token.to_string(),
            user: UserInfo {
                id: 1,
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
            },
        }
    }

    /// Storage that never publishes change notifications, so only polling and
    /// foreground transitions can observe its writes.
    #[derive(Default)]
    struct SilentStorage {
        session: Mutex<Option<StoredSession>>,
        fail_reads: AtomicBool,
        changes: store::ChangeNotifier,
    }

    #[async_trait]
    impl SessionStorage for SilentStorage {
        async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("disk unavailable")));
            }
            Ok(self.session.lock().await.clone())
        }

        async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
            *self.session.lock().await = Some(session.clone());
            Ok(())
        }

        async fn clear(&self) -> Result<(), StorageError> {
            *self.session.lock().await = None;
            Ok(())
        }

        fn subscribe(&self) -> watch::Receiver<u64> {
            self.changes.subscribe()
        }
    }

    const POLL: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_bootstrap_leaves_pending() {
        let storage = Arc::new(MemorySessionStore::new());
        let gate = SessionGate::new(storage.clone(), POLL);
        assert!(gate.current().is_pending());
        assert_eq!(gate.bootstrap().await, SessionState::Unauthenticated);

        storage.save(&session("abc")).await.unwrap();
        let gate = SessionGate::new(storage, POLL);
        assert_eq!(
            gate.bootstrap().await,
            SessionState::Authenticated {
                token: "abc".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_repeated_reconcile_never_toggles() {
        let storage = Arc::new(MemorySessionStore::new());
        storage.save(&session("abc")).await.unwrap();
        let gate = SessionGate::new(storage, POLL);
        let mut rx = gate.subscribe();
        rx.borrow_and_update();

        assert!(gate.reconcile(Trigger::Startup).await);
        rx.borrow_and_update();
        for _ in 0..5 {
            assert!(!gate.reconcile(Trigger::Poll).await);
        }
        assert!(!rx.has_changed().unwrap());
        assert!(gate.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_empty_token_is_absent() {
        let storage = Arc::new(MemorySessionStore::new());
        storage.save(&session("")).await.unwrap();
        let gate = SessionGate::new(storage, POLL);
        assert_eq!(gate.bootstrap().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_read_failure_keeps_state() {
        let storage = Arc::new(SilentStorage::default());
        storage.save(&session("abc")).await.unwrap();
        let gate = SessionGate::new(storage.clone(), POLL);
        gate.bootstrap().await;

        storage.fail_reads.store(true, Ordering::SeqCst);
        assert!(!gate.reconcile(Trigger::Poll).await);
        assert!(gate.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_read_failure_at_startup_shows_sign_in() {
        let storage = Arc::new(SilentStorage::default());
        storage.fail_reads.store(true, Ordering::SeqCst);
        let gate = SessionGate::new(storage, POLL);
        assert_eq!(gate.bootstrap().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_corrupt_session_cleared() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), b"garbage").unwrap();
        let storage = Arc::new(store::FileSessionStore::new(dir.path().to_path_buf()));

        let gate = SessionGate::new(storage.clone(), POLL);
        assert_eq!(gate.bootstrap().await, SessionState::Unauthenticated);
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_picks_up_writes_within_one_interval() {
        let storage = Arc::new(SilentStorage::default());
        let gate = Arc::new(SessionGate::new(storage.clone(), POLL));
        gate.bootstrap().await;
        let runner = tokio::spawn({
            let gate = gate.clone();
            async move { gate.run().await }
        });

        storage.save(&session("abc")).await.unwrap();
        tokio::time::sleep(POLL + Duration::from_millis(10)).await;
        assert!(gate.current().is_authenticated());

        storage.clear().await.unwrap();
        tokio::time::sleep(POLL + Duration::from_millis(10)).await;
        assert_eq!(gate.current(), SessionState::Unauthenticated);

        runner.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_notification_is_immediate() {
        let storage = Arc::new(MemorySessionStore::new());
        let gate = Arc::new(SessionGate::new(storage.clone(), Duration::from_secs(3600)));
        gate.bootstrap().await;
        let mut rx = gate.subscribe();
        let runner = tokio::spawn({
            let gate = gate.clone();
            async move { gate.run().await }
        });
        tokio::task::yield_now().await;

        let start = tokio::time::Instant::now();
        storage.save(&session("abc")).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_authenticated());
        assert!(start.elapsed() < POLL);

        runner.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreground_triggers_reconcile() {
        let storage = Arc::new(SilentStorage::default());
        let gate = Arc::new(SessionGate::new(storage.clone(), Duration::from_secs(3600)));
        gate.bootstrap().await;
        let mut rx = gate.subscribe();
        let runner = tokio::spawn({
            let gate = gate.clone();
            async move { gate.run().await }
        });

        tokio::task::yield_now().await;

        let start = tokio::time::Instant::now();
        storage.save(&session("abc")).await.unwrap();
        gate.on_lifecycle(AppLifecycle::Background);
        gate.on_lifecycle(AppLifecycle::Foreground);
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_authenticated());
        assert!(start.elapsed() < POLL);

        runner.abort();
    }
}
