use async_trait::async_trait;
use ocdtracker_core::Account;

use crate::error::StorageError;
use crate::types::UpdateOutcome;

/// Account persistence, keyed by the identity uid.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account under `id` with the present allow-listed fields.
    async fn create_account(&self, id: &str, account: &Account) -> Result<(), StorageError>;

    /// Load an account. Absence is `StorageError::NotFound`.
    async fn get_account(&self, id: &str) -> Result<Account, StorageError>;

    /// Apply the present allow-listed fields. An instance with nothing
    /// present is `UpdateOutcome::NoFields` and touches no row.
    async fn update_account(
        &self,
        id: &str,
        account: &Account,
    ) -> Result<UpdateOutcome, StorageError>;

    /// Delete the account row. Returns the number of rows removed.
    async fn delete_account(&self, id: &str) -> Result<u64, StorageError>;

    async fn account_exists(&self, id: &str) -> Result<bool, StorageError>;
}
