//! # Database module: identity store
//!
//! Everything here is gated behind `#[cfg(feature = "server")]` so client builds never
//! pull in SQLx or Tokio networking code.
//!
//! ## Design
//!
//! [`IdentityStore`] is the single seam between the credential validator and storage.
//! Every operation touches at most one row with one statement. Email uniqueness is
//! enforced by the store itself (the `users_email_key` constraint in PostgreSQL, the
//! insert lock in memory) and surfaces as [`StoreError::Duplicate`]; callers never
//! check-then-insert.
//!
//! ## Implementations
//!
//! - [`PgIdentityStore`]: PostgreSQL via a shared [`sqlx::PgPool`] (see [`connect`]).
//! - [`MemoryIdentityStore`]: in-process, for tests and local runs without a database.

#[cfg(feature = "server")]
mod memory;
#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod postgres;

#[cfg(feature = "server")]
pub use memory::MemoryIdentityStore;
#[cfg(feature = "server")]
pub use pool::connect;
#[cfg(feature = "server")]
pub use postgres::PgIdentityStore;

#[cfg(feature = "server")]
pub use store::{IdentityStore, StoreError};

#[cfg(feature = "server")]
mod store {
    use async_trait::async_trait;
    use thiserror::Error;

    use crate::models::{Account, NewAccount};

    #[derive(Debug, Error)]
    pub enum StoreError {
        /// A uniqueness constraint rejected the write.
        #[error("unique constraint violated: {constraint}")]
        Duplicate { constraint: String },
        #[error("database error: {0}")]
        Database(#[from] sqlx::Error),
    }

    impl StoreError {
        pub fn is_duplicate(&self) -> bool {
            matches!(self, StoreError::Duplicate { .. })
        }
    }

    /// Single-table account storage.
    #[async_trait]
    pub trait IdentityStore: Send + Sync {
        async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

        /// Find the account matching `email` or `federated_id`. When two different rows
        /// match, the one holding the federated id wins.
        async fn find_by_email_or_federated_id(
            &self,
            email: &str,
            federated_id: Option<&str>,
        ) -> Result<Option<Account>, StoreError>;

        async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

        /// Set the federated id on an account that has none yet. Returns `None` when the
        /// row was already linked (or no longer exists).
        async fn link_federated_id(
            &self,
            id: i64,
            federated_id: &str,
        ) -> Result<Option<Account>, StoreError>;
    }
}
