//! LogStore implementation for PgStorage.

use async_trait::async_trait;
use ocdtracker_core::{LogPage, OcdLog, PaginationSpec};
use sqlx::Row;
use uuid::Uuid;

use super::{LOG_COLUMNS, PgStorage, log_rows, row_to_log};
use crate::error::StorageError;
use crate::statement::{UpdatePlan, build_insert, build_update};
use crate::traits::LogStore;
use crate::types::UpdateOutcome;

#[async_trait]
impl LogStore for PgStorage {
    async fn create_log(&self, account_id: &str, log: &OcdLog) -> Result<Uuid, StorageError> {
        let statement = build_insert(log, vec![account_id.into()])?.returning("id");
        let row = statement.query().fetch_one(&self.pool).await?;
        log_rows("create", 1);
        Ok(row.try_get("id")?)
    }

    async fn get_log(&self, account_id: &str, id: Uuid) -> Result<OcdLog, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {LOG_COLUMNS} FROM ocdlog WHERE account_id = $1 AND id = $2 LIMIT 1"
        ))
        .bind(account_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(r) => row_to_log(&r),
            None => Err(StorageError::NotFound { entity: "ocdlog", id: id.to_string() }),
        }
    }

    async fn update_log(
        &self,
        account_id: &str,
        id: Uuid,
        log: &OcdLog,
    ) -> Result<UpdateOutcome, StorageError> {
        match build_update(log, vec![account_id.into(), id.into()])? {
            UpdatePlan::Execute(statement) => {
                let rows = self.exec_logged(&statement, "update").await?;
                Ok(UpdateOutcome::Applied { rows })
            },
            UpdatePlan::NoFields => {
                tracing::debug!(log = %id, "no fields to update");
                Ok(UpdateOutcome::NoFields)
            },
        }
    }

    async fn delete_log(&self, account_id: &str, id: Uuid) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM ocdlog WHERE account_id = $1 AND id = $2")
            .bind(account_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        log_rows("delete", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn delete_all_logs(&self, account_id: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM ocdlog WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        log_rows("delete", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn log_exists(&self, account_id: &str, id: Uuid) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM ocdlog WHERE account_id = $1 AND id = $2)",
        )
        .bind(account_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_logs(
        &self,
        account_id: &str,
        page: PaginationSpec,
    ) -> Result<LogPage, StorageError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ocdlog WHERE account_id = $1")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT {LOG_COLUMNS} FROM ocdlog WHERE account_id = $1
             ORDER BY created_at ASC, id ASC LIMIT $2 OFFSET $3"
        ))
        .bind(account_id)
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        let logs = rows.iter().map(row_to_log).collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = logs.len(), "retrieved {} logs", logs.len());
        let count = u64::try_from(logs.len()).unwrap_or(u64::MAX);
        Ok(LogPage {
            pagination: page.details(count, u64::try_from(total).unwrap_or(0)),
            logs,
        })
    }
}
