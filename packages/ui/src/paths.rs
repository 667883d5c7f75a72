//! Platform data directory, session store and client config.
//!
//! Everything lives under `<data_dir>/auth-app/`:
//! - `session.json`: the persisted session (see [`store::FileSessionStore`])
//! - `client.toml`: optional [`store::ClientConfig`] overrides

use std::path::PathBuf;
use std::sync::Arc;

use store::{ClientConfig, FileSessionStore, SessionStorage};

const APP_DIR: &str = "auth-app";

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Create the filesystem-backed session store.
pub fn make_session_store() -> Arc<dyn SessionStorage> {
    Arc::new(FileSessionStore::new(data_dir()))
}

/// Read `client.toml`, falling back to defaults when it is missing or unreadable.
pub fn load_client_config() -> ClientConfig {
    let path = data_dir().join(ClientConfig::filename());
    match std::fs::read_to_string(&path) {
        Ok(text) => ClientConfig::from_toml(&text).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid {}: {e}", path.display());
            ClientConfig::default()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ClientConfig::default(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", path.display());
            ClientConfig::default()
        }
    }
}
