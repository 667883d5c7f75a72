//! On-device persistence for the signed-in session.
//!
//! The persisted session is a token plus the profile returned alongside it, always
//! written and removed together. Every write bumps a change counter that readers
//! receive through [`SessionStorage::subscribe`].

pub mod config;
mod session;

mod file_store;
pub use file_store::FileSessionStore;

mod memory;
pub use memory::MemorySessionStore;

pub use config::ClientConfig;
pub use session::{ChangeNotifier, SessionStorage, StorageError, StoredSession};
