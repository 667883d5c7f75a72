//! # Auth client
//!
//! Talks to `/api/auth/*` and writes the result to persisted storage. The flows never
//! touch [`SessionState`](crate::SessionState): a successful sign-in saves the token and
//! profile as one unit, logout clears them, and the session gate notices.
//!
//! Failures are surfaced as [`ClientError`]. Screens show
//! [`ClientError::alert_message`], which prefers the server's message. Nothing is
//! retried automatically.

use std::sync::Arc;

use api::{AuthResponse, ErrorBody, UserInfo};
use api::models::{GoogleSignInRequest, LoginRequest, RegisterRequest};
use async_trait::async_trait;
use serde::Serialize;
use store::{SessionStorage, StorageError, StoredSession};
use thiserror::Error;

pub const MISSING_FIELDS: &str = "Please fill in all fields";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Provider(String),
}

impl ClientError {
    /// Text for the blocking alert: the server-provided message, else the error's own
    /// description, else `fallback`.
    pub fn alert_message(&self, fallback: &str) -> String {
        let message = match self {
            ClientError::Rejected { message, .. } => message.clone(),
            other => Some(other.to_string()),
        };
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Identity asserted by the federated provider after its consent flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    pub email: String,
    pub federated_id: String,
    pub display_name: String,
}

/// Platform sign-in SDK (Google Sign-In on mobile).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<FederatedIdentity, ClientError>;

    /// Drop the provider's own cached sign-in. Defaults to nothing.
    async fn sign_out(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn SessionStorage>,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, ClientError> {
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(MISSING_FIELDS.to_string()));
        }
        tracing::info!("Starting login process");
        self.exchange(
            "/api/auth/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, ClientError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(MISSING_FIELDS.to_string()));
        }
        tracing::info!("Starting registration process");
        self.exchange(
            "/api/auth/register",
            &RegisterRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Run the provider's consent flow, then exchange the identity for a session.
    pub async fn sign_in_with(
        &self,
        provider: &dyn IdentityProvider,
    ) -> Result<UserInfo, ClientError> {
        let identity = provider.sign_in().await?;
        self.google_sign_in(&identity).await
    }

    pub async fn google_sign_in(
        &self,
        identity: &FederatedIdentity,
    ) -> Result<UserInfo, ClientError> {
        tracing::info!("Starting Google sign-in exchange");
        self.exchange(
            "/api/auth/google",
            &GoogleSignInRequest {
                email: identity.email.clone(),
                google_id: identity.federated_id.clone(),
                name: identity.display_name.clone(),
            },
        )
        .await
    }

    /// Remove the persisted token and profile.
    pub async fn logout(&self) -> Result<(), ClientError> {
        tracing::info!("Starting logout process");
        self.storage.clear().await?;
        tracing::info!("Auth data cleared successfully");
        Ok(())
    }

    /// Profile persisted with the current session, if any.
    pub async fn profile(&self) -> Result<Option<UserInfo>, ClientError> {
        Ok(self.storage.load().await?.map(|s| s.user))
    }

    async fn exchange<B: Serialize>(&self, path: &str, body: &B) -> Result<UserInfo, ClientError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.json::<ErrorBody>().await.ok().map(|b| b.message);
            tracing::warn!(status = status.as_u16(), ?message, "auth request rejected");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let auth: AuthResponse = response.json().await?;
        self.storage
            .save(&StoredSession {
                token: auth.token,
                user: auth.user.clone(),
            })
            .await?;
        tracing::info!(user_id = auth.user.id, "session stored");
        Ok(auth.user)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use api::auth::TokenSigner;
    use api::db::MemoryIdentityStore;
    use api::{AppState, AuthService};
    use store::MemorySessionStore;

    use super::*;
    use crate::session::{SessionGate, SessionState};

    /// Serve the real auth router on an ephemeral port.
    async fn spawn_server() -> (String, TokenSigner) {
        let tokens = TokenSigner::new("client-test-secret", chrono::Duration::hours(1)).unwrap();
        let service = AuthService::new(Arc::new(MemoryIdentityStore::new()), tokens.clone());
        let router = api::router(AppState::new(service, false));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{addr}"), tokens)
    }

    struct FakeGoogle(FederatedIdentity);

    #[async_trait]
    impl IdentityProvider for FakeGoogle {
        async fn sign_in(&self) -> Result<FederatedIdentity, ClientError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_register_login_logout_flow_drives_gate() {
        let (url, tokens) = spawn_server().await;
        let storage = Arc::new(MemorySessionStore::new());
        let client = AuthClient::new(format!("{url}/"), storage.clone());
        let gate = SessionGate::new(storage.clone(), Duration::from_secs(1));
        assert_eq!(gate.bootstrap().await, SessionState::Unauthenticated);

        let user = client.register("alice", "a@x.com", "secret").await.unwrap();
        assert_eq!(user.username, "alice");
        gate.reconcile(crate::Trigger::StorageChanged).await;
        let SessionState::Authenticated { token } = gate.current() else {
            panic!("expected an authenticated session");
        };
        assert_eq!(tokens.verify(&token).unwrap().user_id, user.id);
        assert_eq!(client.profile().await.unwrap(), Some(user.clone()));

        client.logout().await.unwrap();
        gate.reconcile(crate::Trigger::StorageChanged).await;
        assert_eq!(gate.current(), SessionState::Unauthenticated);
        assert_eq!(client.profile().await.unwrap(), None);

        let again = client.login("a@x.com", "secret").await.unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let (url, _) = spawn_server().await;
        let storage = Arc::new(MemorySessionStore::new());
        let client = AuthClient::new(url, storage.clone());

        let err = client.login("nobody@x.com", "secret").await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected { status: 400, .. }));
        assert_eq!(err.alert_message("Invalid credentials"), "Invalid credentials");
        assert!(storage.load().await.unwrap().is_none());

        client.register("alice", "a@x.com", "secret").await.unwrap();
        let err = client.register("alice", "a@x.com", "secret").await.unwrap_err();
        assert_eq!(err.alert_message("Something went wrong"), "User already exists");
    }

    #[tokio::test]
    async fn test_empty_fields_never_sent() {
        let storage = Arc::new(MemorySessionStore::new());
        // Nothing listens here; validation must fail first
        let client = AuthClient::new("http://127.0.0.1:1", storage);

        let err = client.login("", "secret").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.alert_message("x"), MISSING_FIELDS);

        let err = client.register("alice", "a@x.com", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_google_sign_in_with_provider() {
        let (url, _) = spawn_server().await;
        let storage = Arc::new(MemorySessionStore::new());
        let client = AuthClient::new(url, storage.clone());

        let provider = FakeGoogle(FederatedIdentity {
            email: "g@x.com".to_string(),
            federated_id: "g-1".to_string(),
            display_name: "Gina".to_string(),
        });
        let user = client.sign_in_with(&provider).await.unwrap();
        assert_eq!(user.username, "Gina");
        assert_eq!(storage.load().await.unwrap().unwrap().user, user);
    }

    #[test]
    fn test_alert_message_fallback() {
        let err = ClientError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.alert_message("Something went wrong"), "Something went wrong");
    }
}
