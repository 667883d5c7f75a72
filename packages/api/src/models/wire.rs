//! JSON bodies exchanged with `/api/auth/*`.
//!
//! Request fields default to empty strings so that a missing field reaches the
//! validation path instead of failing deserialization.

use serde::{Deserialize, Serialize};

use super::UserInfo;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Identity asserted by Google after the on-device consent flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleSignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "googleId")]
    pub google_id: String,
    #[serde(default)]
    pub name: String,
}

/// Successful register / login / google response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// Response of `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeResponse {
    pub user: UserInfo,
}

/// Body of every error response. `error` carries internal detail in development only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
