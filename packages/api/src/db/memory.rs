use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{IdentityStore, StoreError};
use crate::models::{Account, NewAccount};

/// In-memory IdentityStore for tests and database-less local runs.
///
/// All rows live behind one lock, so the uniqueness checks in [`insert`] and
/// [`link_federated_id`] are atomic with the write, like a table constraint.
///
/// [`insert`]: IdentityStore::insert
/// [`link_federated_id`]: IdentityStore::link_federated_id
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    rows: Mutex<Vec<Account>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }

    /// Number of accounts registered under `email`.
    pub async fn count_email(&self, email: &str) -> usize {
        self.rows
            .lock()
            .await
            .iter()
            .filter(|a| a.email == email)
            .count()
    }
}

fn duplicate(constraint: &str) -> StoreError {
    StoreError::Duplicate {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.rows.lock().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_email_or_federated_id(
        &self,
        email: &str,
        federated_id: Option<&str>,
    ) -> Result<Option<Account>, StoreError> {
        let rows = self.rows.lock().await;
        let by_federated = federated_id.and_then(|fid| {
            rows.iter()
                .find(|a| a.federated_id.as_deref() == Some(fid))
        });
        Ok(by_federated
            .or_else(|| rows.iter().find(|a| a.email == email))
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut rows = self.rows.lock().await;

        if rows.iter().any(|a| a.email == account.email) {
            return Err(duplicate("users_email_key"));
        }
        if let Some(fid) = account.federated_id.as_deref() {
            if rows.iter().any(|a| a.federated_id.as_deref() == Some(fid)) {
                return Err(duplicate("users_google_id_key"));
            }
        }

        let now = Utc::now();
        let id = rows.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let row = Account {
            id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            federated_id: account.federated_id,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn link_federated_id(
        &self,
        id: i64,
        federated_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut rows = self.rows.lock().await;

        if rows
            .iter()
            .any(|a| a.id != id && a.federated_id.as_deref() == Some(federated_id))
        {
            return Err(duplicate("users_google_id_key"));
        }

        let Some(row) = rows
            .iter_mut()
            .find(|a| a.id == id && a.federated_id.is_none())
        else {
            return Ok(None);
        };
        row.federated_id = Some(federated_id.to_string());
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }
}
