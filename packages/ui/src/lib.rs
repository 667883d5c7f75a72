//! This crate contains the shared client for the workspace: the session gate, the auth
//! flows, and the Dioxus context that connects them to the views.

use dioxus::prelude::{asset, manganis, Asset};

pub const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

mod paths;
pub use paths::{data_dir, load_client_config, make_session_store};

pub mod session;
pub use session::{AppLifecycle, SessionGate, SessionState, Trigger};

pub mod client;
pub use client::{AuthClient, ClientError, FederatedIdentity, IdentityProvider};

mod auth;
pub use auth::{
    use_auth_client, use_identity_provider, use_lifecycle, use_session, LogoutButton,
    SessionProvider, SessionServices,
};
