//! # Account model
//!
//! Two representations of an account:
//!
//! ## [`Account`] (server only)
//!
//! The complete row from the `users` table, loaded with [`sqlx::FromRow`]:
//!
//! - `id`: `BIGSERIAL` primary key.
//! - `username`: display name from registration or from the Google profile.
//! - `email`: unique identity key.
//! - `password_hash`: Argon2 PHC string, present only for password accounts.
//! - `federated_id`: Google account id (`google_id` column), present once linked.
//! - `created_at` / `updated_at`: audit timestamps.
//!
//! [`Account::to_info`] projects it into a [`UserInfo`].
//!
//! ## [`UserInfo`]
//!
//! The client-safe subset (`id`, `username`, `email`) returned in every auth response and
//! persisted on-device next to the session token.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;

/// Full account record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    #[sqlx(rename = "google_id")]
    pub federated_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl Account {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Values for a row about to be inserted.
#[cfg(feature = "server")]
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub federated_id: Option<String>,
}

/// Account information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl UserInfo {
    /// Name shown on the dashboard, falling back to the email.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}
