//! PostgreSQL-backed [`IdentityStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::{IdentityStore, StoreError};
use crate::models::{Account, NewAccount};

#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation to [`StoreError::Duplicate`], anything else to `Database`.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate {
                constraint: db_err.constraint().unwrap_or("unknown").to_string(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email_or_federated_id(
        &self,
        email: &str,
        federated_id: Option<&str>,
    ) -> Result<Option<Account>, StoreError> {
        Ok(sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE email = $1 OR google_id = $2
            ORDER BY (google_id = $2) IS TRUE DESC, id ASC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(federated_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash, google_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.federated_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn link_federated_id(
        &self,
        id: i64,
        federated_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        sqlx::query_as(
            r#"
            UPDATE users
            SET google_id = $1, updated_at = NOW()
            WHERE id = $2 AND google_id IS NULL
            RETURNING *
            "#,
        )
        .bind(federated_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }
}
