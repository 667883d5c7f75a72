//! # Credential validator
//!
//! [`AuthService`] decides whether a claimed identity is accepted and, on acceptance,
//! mints a session token bound to the account id.
//!
//! - [`register`](AuthService::register): creates a password account. Duplicate emails
//!   are detected by the store's uniqueness constraint, never by a prior lookup.
//! - [`login`](AuthService::login): read-only; every failure is the same
//!   [`AuthError::InvalidCredentials`].
//! - [`google_sign_in`](AuthService::google_sign_in): finds the account by email or
//!   Google id, links the Google id to a password account that lacks one, or creates a
//!   password-less account.
//!
//! Argon2 runs on the blocking pool so hashing never stalls the async workers.

use std::sync::Arc;

use crate::auth::{self, Claims, TokenSigner};
use crate::db::IdentityStore;
use crate::error::{AuthError, MISSING_FIELDS};
use crate::models::{Account, NewAccount, UserInfo};

/// A freshly minted token and the account it is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    tokens: Arc<TokenSigner>,
}

impl AuthService {
    pub fn new(store: Arc<dyn IdentityStore>, tokens: TokenSigner) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }

    pub fn tokens(&self) -> &TokenSigner {
        &self.tokens
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(MISSING_FIELDS.to_string()));
        }

        tracing::info!(email, "registration attempt");

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
            .await
            .map_err(|e| AuthError::server(e.to_string()))?
            .map_err(AuthError::server)?;

        let account = match self
            .store
            .insert(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: Some(password_hash),
                federated_id: None,
            })
            .await
        {
            Ok(account) => account,
            Err(e) if e.is_duplicate() => {
                tracing::info!(email, "registration rejected: email already registered");
                return Err(AuthError::Conflict);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = account.id, "user registered");
        self.mint(&account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = email.trim();

        let Some(account) = self.store.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        // Accounts created through Google have no password to check against
        let Some(hash) = account.password_hash.clone() else {
            return Err(AuthError::InvalidCredentials);
        };

        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::server(e.to_string()))?
            .map_err(AuthError::server)?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = account.id, "login successful");
        self.mint(&account)
    }

    pub async fn google_sign_in(
        &self,
        email: &str,
        federated_id: &str,
        display_name: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = email.trim();
        let federated_id = Some(federated_id.trim()).filter(|id| !id.is_empty());

        tracing::info!(email, federated_id, "google sign-in attempt");

        let existing = self
            .store
            .find_by_email_or_federated_id(email, federated_id)
            .await?;

        let account = match existing {
            Some(account) => self.link_if_needed(account, federated_id).await?,
            None => {
                let insert = self
                    .store
                    .insert(NewAccount {
                        username: display_name.to_string(),
                        email: email.to_string(),
                        password_hash: None,
                        federated_id: federated_id.map(str::to_string),
                    })
                    .await;
                match insert {
                    Ok(account) => {
                        tracing::info!(user_id = account.id, "account created from google identity");
                        account
                    }
                    // Lost a race with a concurrent sign-in for the same identity
                    Err(e) if e.is_duplicate() => self
                        .store
                        .find_by_email_or_federated_id(email, federated_id)
                        .await?
                        .ok_or_else(|| AuthError::server(e.to_string()))?,
                    Err(e) => return Err(e.into()),
                }
            }
        };

        self.mint(&account)
    }

    /// Resolve the bearer of `token` to their account.
    pub async fn authenticate(&self, token: &str) -> Result<UserInfo, AuthError> {
        let Claims { user_id, .. } = self
            .tokens
            .verify(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        self.store
            .find_by_id(user_id)
            .await?
            .map(|account| account.to_info())
            .ok_or(AuthError::Unauthenticated)
    }

    async fn link_if_needed(
        &self,
        account: Account,
        federated_id: Option<&str>,
    ) -> Result<Account, AuthError> {
        let Some(federated_id) = federated_id else {
            return Ok(account);
        };
        if account.federated_id.is_some() {
            return Ok(account);
        }

        match self.store.link_federated_id(account.id, federated_id).await? {
            Some(linked) => {
                tracing::info!(user_id = linked.id, "linked google identity to account");
                Ok(linked)
            }
            // Linked concurrently; the row is still the same account
            None => Ok(account),
        }
    }

    fn mint(&self, account: &Account) -> Result<AuthSession, AuthError> {
        Ok(AuthSession {
            token: self.tokens.issue(account.id)?,
            user: account.to_info(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryIdentityStore, StoreError};
    use chrono::Duration;

    fn service() -> (AuthService, Arc<MemoryIdentityStore>) {
        let store = Arc::new(MemoryIdentityStore::new());
        let tokens = TokenSigner::new("test-secret", Duration::hours(1)).unwrap();
        (AuthService::new(store.clone(), tokens), store)
    }

    #[tokio::test]
    async fn test_register_then_login_same_account() {
        let (service, _) = service();
        let registered = service.register("alice", "a@x.com", "secret").await.unwrap();
        assert!(!registered.token.is_empty());

        let logged_in = service.login("a@x.com", "secret").await.unwrap();
        assert_eq!(logged_in.user, registered.user);

        let claims = service.tokens().verify(&logged_in.token).unwrap();
        assert_eq!(claims.user_id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_empty_fields() {
        let (service, store) = service();
        for (u, e, p) in [("", "a@x.com", "pw"), ("alice", "  ", "pw"), ("alice", "a@x.com", "")] {
            let err = service.register(u, e, p).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let (service, store) = service();
        service.register("alice", "a@x.com", "secret").await.unwrap();

        let err = service
            .register("alice2", "a@x.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(store.count_email("a@x.com").await, 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service.register("alice", "a@x.com", "secret").await.unwrap();

        let wrong_password = service.login("a@x.com", "nope").await.unwrap_err();
        let unknown_email = service.login("b@x.com", "secret").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_federated_only_account_rejected() {
        let (service, _) = service();
        service.google_sign_in("g@x.com", "g-1", "Gina").await.unwrap();

        let err = service.login("g@x.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_google_links_existing_password_account() {
        let (service, store) = service();
        let registered = service.register("alice", "a@x.com", "secret").await.unwrap();

        let google = service
            .google_sign_in("a@x.com", "g-1", "Alice A.")
            .await
            .unwrap();
        assert_eq!(google.user.id, registered.user.id);
        assert_eq!(store.len().await, 1);

        let row = store.find_by_id(registered.user.id).await.unwrap().unwrap();
        assert_eq!(row.federated_id.as_deref(), Some("g-1"));
        // The password still works after linking
        assert!(service.login("a@x.com", "secret").await.is_ok());

        // Same Google id, different email: same row
        let again = service
            .google_sign_in("alice@elsewhere.com", "g-1", "Alice A.")
            .await
            .unwrap();
        assert_eq!(again.user.id, registered.user.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_google_creates_account_without_password() {
        let (service, store) = service();
        let session = service.google_sign_in("g@x.com", "g-1", "Gina").await.unwrap();
        assert_eq!(session.user.username, "Gina");

        let row = store.find_by_id(session.user.id).await.unwrap().unwrap();
        assert!(row.password_hash.is_none());
        assert_eq!(row.federated_id.as_deref(), Some("g-1"));

        let second = service.google_sign_in("g@x.com", "g-1", "Gina").await.unwrap();
        assert_eq!(second.user.id, session.user.id);
        assert_eq!(store.len().await, 1);
    }

    /// Store whose first email-or-federated lookup misses, as if a concurrent sign-in
    /// inserted the row right after it.
    struct LateWriterStore {
        inner: MemoryIdentityStore,
        missed: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl IdentityStore for LateWriterStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_email_or_federated_id(
            &self,
            email: &str,
            federated_id: Option<&str>,
        ) -> Result<Option<Account>, StoreError> {
            if !self.missed.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner
                .find_by_email_or_federated_id(email, federated_id)
                .await
        }

        async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
            self.inner.insert(account).await
        }

        async fn link_federated_id(
            &self,
            id: i64,
            federated_id: &str,
        ) -> Result<Option<Account>, StoreError> {
            self.inner.link_federated_id(id, federated_id).await
        }
    }

    #[tokio::test]
    async fn test_google_insert_race_reuses_winning_row() {
        let store = Arc::new(LateWriterStore {
            inner: MemoryIdentityStore::new(),
            missed: Default::default(),
        });
        let winner = store
            .inner
            .insert(NewAccount {
                username: "Gina".to_string(),
                email: "g@x.com".to_string(),
                password_hash: None,
                federated_id: Some("g-1".to_string()),
            })
            .await
            .unwrap();

        let tokens = TokenSigner::new("test-secret", Duration::hours(1)).unwrap();
        let service = AuthService::new(store.clone(), tokens);

        let session = service.google_sign_in("g@x.com", "g-1", "Gina").await.unwrap();
        assert_eq!(session.user.id, winner.id);
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_authenticate_resolves_token_bearer() {
        let (service, _) = service();
        let session = service.register("alice", "a@x.com", "secret").await.unwrap();

        let user = service.authenticate(&session.token).await.unwrap();
        assert_eq!(user, session.user);

        assert!(matches!(
            service.authenticate("garbage").await,
            Err(AuthError::Unauthenticated)
        ));
    }
}
