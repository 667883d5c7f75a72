//! # HTTP surface
//!
//! | Route | Success | Failure |
//! |-------|---------|---------|
//! | `POST /api/auth/register` | `201 {message, token, user}` | `400` validation / conflict, `500` |
//! | `POST /api/auth/login` | `200 {message, token, user}` | `400 Invalid credentials`, `500` |
//! | `POST /api/auth/google` | `200 {message, token, user}` | `500` |
//! | `GET /api/auth/me` | `200 {user}` | `401 Not authenticated` |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::error::{AuthError, ErrorResponse, MISSING_FIELDS};
use crate::models::{
    AuthResponse, GoogleSignInRequest, LoginRequest, MeResponse, RegisterRequest,
};
use crate::service::{AuthService, AuthSession};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: AuthService,
    /// Attach internal error detail to 500 responses (development only).
    pub expose_error_detail: bool,
}

impl AppState {
    pub fn new(service: AuthService, expose_error_detail: bool) -> Self {
        Self {
            service,
            expose_error_detail,
        }
    }

    fn reject(&self, err: AuthError) -> ErrorResponse {
        if let AuthError::Server { detail } = &err {
            tracing::error!(%detail, "request failed");
        }
        err.into_error_response(self.expose_error_detail)
    }
}

/// Build the `/api/auth` router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/google", post(google_sign_in))
        .route("/api/auth/me", get(me))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unwrap a JSON body, answering a malformed one with `fallback` so every failure
/// still carries an `ErrorBody`.
fn parse_body<T>(
    state: &AppState,
    body: Result<Json<T>, JsonRejection>,
    fallback: impl FnOnce(&JsonRejection) -> AuthError,
) -> Result<T, ErrorResponse> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::warn!(status = %rejection.status(), "rejected request body: {}", rejection.body_text());
            Err(state.reject(fallback(&rejection)))
        }
    }
}

fn respond(message: &str, session: AuthSession) -> Json<AuthResponse> {
    Json(AuthResponse {
        message: message.to_string(),
        token: session.token,
        user: session.user,
    })
}

async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ErrorResponse> {
    let body = parse_body(&state, body, |_| {
        AuthError::Validation(MISSING_FIELDS.to_string())
    })?;
    let session = state
        .service
        .register(&body.username, &body.email, &body.password)
        .await
        .map_err(|e| state.reject(e))?;

    Ok((
        StatusCode::CREATED,
        respond("User registered successfully", session),
    ))
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ErrorResponse> {
    let body = parse_body(&state, body, |_| AuthError::InvalidCredentials)?;
    let session = state
        .service
        .login(&body.email, &body.password)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(respond("Login successful", session))
}

async fn google_sign_in(
    State(state): State<AppState>,
    body: Result<Json<GoogleSignInRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ErrorResponse> {
    let body = parse_body(&state, body, |rejection| {
        AuthError::server(rejection.body_text())
    })?;
    let session = state
        .service
        .google_sign_in(&body.email, &body.google_id, &body.name)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(respond("Google Sign-In successful", session))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, ErrorResponse> {
    let Some(token) = bearer_token(&headers) else {
        return Err(state.reject(AuthError::Unauthenticated));
    };

    let user = state
        .service
        .authenticate(token)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(MeResponse { user }))
}
