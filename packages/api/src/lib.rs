//! # API crate: authentication backend and shared wire types
//!
//! The server half of the session-token system, plus the JSON types the mobile client
//! shares with it. Client builds depend on this crate with `default-features = false`
//! and only see [`models`].
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`models`] | none | `Account` row (server) and the client-safe `UserInfo`, request/response bodies |
//! | [`auth`] | `server` | Argon2id password hashing, HS256 session tokens |
//! | [`db`] | `server` | `IdentityStore` trait with PostgreSQL and in-memory implementations |
//! | [`error`] | `server` | `AuthError` taxonomy and its HTTP mapping |
//! | [`service`] | `server` | Credential validator: register, login, Google sign-in |
//! | [`routes`] | `server` | Axum router for `/api/auth/*` |
//! | [`settings`] | `server` | Layered configuration (`config.toml` + `AUTH_*` env) |

pub mod auth;
pub mod db;
#[cfg(feature = "server")]
pub mod error;
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod service;
#[cfg(feature = "server")]
pub mod settings;

pub use models::{AuthResponse, ErrorBody, UserInfo};

#[cfg(feature = "server")]
pub use error::AuthError;
#[cfg(feature = "server")]
pub use routes::{router, AppState};
#[cfg(feature = "server")]
pub use service::{AuthService, AuthSession};
#[cfg(feature = "server")]
pub use settings::Settings;
