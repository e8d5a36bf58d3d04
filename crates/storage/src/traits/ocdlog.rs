use async_trait::async_trait;
use ocdtracker_core::{LogPage, OcdLog, PaginationSpec};
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::UpdateOutcome;

/// Log entry persistence. Every operation is scoped to the owning account,
/// so an id belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Insert a log for `account_id`. Returns the server-assigned id.
    async fn create_log(&self, account_id: &str, log: &OcdLog) -> Result<Uuid, StorageError>;

    /// Load one owned log. Absence is `StorageError::NotFound`.
    async fn get_log(&self, account_id: &str, id: Uuid) -> Result<OcdLog, StorageError>;

    async fn update_log(
        &self,
        account_id: &str,
        id: Uuid,
        log: &OcdLog,
    ) -> Result<UpdateOutcome, StorageError>;

    async fn delete_log(&self, account_id: &str, id: Uuid) -> Result<u64, StorageError>;

    /// Bulk delete every log of the account.
    async fn delete_all_logs(&self, account_id: &str) -> Result<u64, StorageError>;

    async fn log_exists(&self, account_id: &str, id: Uuid) -> Result<bool, StorageError>;

    /// One page ordered by creation time ascending. `total` comes from a
    /// count query issued before the page query.
    async fn list_logs(
        &self,
        account_id: &str,
        page: PaginationSpec,
    ) -> Result<LogPage, StorageError>;
}
