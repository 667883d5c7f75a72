//! Error taxonomy of the credential validator and its HTTP mapping.
//!
//! | Variant | Status | Message |
//! |---------|--------|---------|
//! | [`AuthError::Validation`] | 400 | field-specific, client-correctable |
//! | [`AuthError::Conflict`] | 400 | `User already exists` |
//! | [`AuthError::InvalidCredentials`] | 400 | `Invalid credentials` |
//! | [`AuthError::Unauthenticated`] | 401 | `Not authenticated` |
//! | [`AuthError::Server`] | 500 | `Server error` |
//!
//! `InvalidCredentials` covers both an unknown email and a wrong password so the
//! response never reveals which accounts exist. Internal detail of a `Server` error is
//! attached as `error` only when the process runs in development mode.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::TokenError;
use crate::db::StoreError;
use crate::models::ErrorBody;

pub const MISSING_FIELDS: &str = "Please fill in all fields";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists")]
    Conflict,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Server error")]
    Server { detail: String },
}

impl AuthError {
    pub fn server(detail: impl Into<String>) -> Self {
        AuthError::Server {
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::Conflict | AuthError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the HTTP response, exposing internal detail only when asked to.
    pub fn into_error_response(self, expose_detail: bool) -> ErrorResponse {
        let status = self.status();
        let error = match &self {
            AuthError::Server { detail } if expose_detail => Some(detail.clone()),
            _ => None,
        };
        ErrorResponse {
            status,
            body: ErrorBody {
                message: self.to_string(),
                error,
            },
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::server(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::server(err.to_string())
    }
}

/// A status code plus JSON [`ErrorBody`].
#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
