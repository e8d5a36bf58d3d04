//! AccountStore implementation for PgStorage.

use async_trait::async_trait;
use ocdtracker_core::Account;

use super::{ACCOUNT_COLUMNS, PgStorage, log_rows, row_to_account};
use crate::error::StorageError;
use crate::statement::{UpdatePlan, build_insert, build_update};
use crate::traits::AccountStore;
use crate::types::UpdateOutcome;

#[async_trait]
impl AccountStore for PgStorage {
    async fn create_account(&self, id: &str, account: &Account) -> Result<(), StorageError> {
        let statement = build_insert(account, vec![id.into()])?;
        self.exec_logged(&statement, "create").await?;
        Ok(())
    }

    async fn get_account(&self, id: &str) -> Result<Account, StorageError> {
        let row =
            sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = $1 LIMIT 1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(r) => row_to_account(&r),
            None => Err(StorageError::NotFound { entity: "account", id: id.to_owned() }),
        }
    }

    async fn update_account(
        &self,
        id: &str,
        account: &Account,
    ) -> Result<UpdateOutcome, StorageError> {
        match build_update(account, vec![id.into()])? {
            UpdatePlan::Execute(statement) => {
                let rows = self.exec_logged(&statement, "update").await?;
                Ok(UpdateOutcome::Applied { rows })
            },
            UpdatePlan::NoFields => {
                tracing::debug!(account = id, "no fields to update");
                Ok(UpdateOutcome::NoFields)
            },
        }
    }

    async fn delete_account(&self, id: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        log_rows("delete", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn account_exists(&self, id: &str) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM account WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
