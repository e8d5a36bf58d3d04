//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by entity.

// Arithmetic in DB operations (pagination, counting) is bounded by DB limits
#![allow(
    clippy::arithmetic_side_effects,
    reason = "DB row counts and pagination are bounded by PostgreSQL limits"
)]

mod account;
mod ocdlog;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use ocdtracker_core::{
    Account, DatabaseConfig, DatabaseTarget, OcdLog, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::kind::EntityKind;
use crate::pg_migrations::run_pg_migrations;
use crate::statement::Statement;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect with bounded retry, then bring the schema up to date.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let storage = Self::connect(config).await?;
        storage.migrate().await?;
        tracing::info!("PgStorage initialized");
        Ok(storage)
    }

    /// Startup handshake: a fixed number of attempts separated by a fixed
    /// delay. This is the only retried operation; exhausting it is fatal.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let options = connect_options(&config.target)?;
        let pool_options = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true);

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match pool_options.clone().connect_with(options.clone()).await {
                Ok(pool) => {
                    tracing::info!(attempts, "established database connection");
                    return Ok(Self { pool });
                },
                Err(last) if attempts >= config.max_attempts => {
                    return Err(StorageError::ConnectRetriesExhausted { attempts, last });
                },
                Err(e) => {
                    tracing::debug!(
                        attempts,
                        error = %e,
                        "failed attempt to establish database connection"
                    );
                    tokio::time::sleep(config.retry_delay).await;
                },
            }
        }
    }

    /// Wrap an existing pool (tests, embedding in another process).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        run_pg_migrations(&self.pool).await.map_err(|e| StorageError::Migration(e.to_string()))
    }

    /// Number of rows in the table behind `kind`.
    pub async fn count_rows(&self, kind: EntityKind) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.table()))
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Run a built statement and log how many rows it touched.
    pub(crate) async fn exec_logged(
        &self,
        statement: &Statement,
        action: &str,
    ) -> Result<u64, StorageError> {
        let result = statement.query().execute(&self.pool).await?;
        let rows = result.rows_affected();
        log_rows(action, rows);
        Ok(rows)
    }
}

pub(crate) fn log_rows(action: &str, rows: u64) {
    tracing::info!(action, rows, "{action}d {rows} record/s");
}

fn connect_options(target: &DatabaseTarget) -> Result<PgConnectOptions, StorageError> {
    match target {
        DatabaseTarget::Url(url) => PgConnectOptions::from_str(url).map_err(StorageError::Database),
        DatabaseTarget::Parts { host, port, user, password, dbname, sslmode } => {
            let ssl_mode = PgSslMode::from_str(sslmode).map_err(StorageError::Database)?;
            Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(dbname)
                .ssl_mode(ssl_mode))
        },
    }
}

pub(crate) const ACCOUNT_COLUMNS: &str =
    "id, email, display_name, photo_url, wake_time, sleep_time, notification_interval,
     created_at, updated_at";

pub(crate) const LOG_COLUMNS: &str =
    "id, account_id, ruminate_minutes, anxiety_level, notes, created_at, updated_at";

pub(crate) fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<Account, StorageError> {
    let created_at: Option<DateTime<Utc>> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        photo_url: row.try_get("photo_url")?,
        wake_time: row.try_get("wake_time")?,
        sleep_time: row.try_get("sleep_time")?,
        notification_interval: row.try_get("notification_interval")?,
        created_at,
        updated_at,
    })
}

pub(crate) fn row_to_log(row: &sqlx::postgres::PgRow) -> Result<OcdLog, StorageError> {
    let created_at: Option<DateTime<Utc>> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;
    Ok(OcdLog {
        id: row.try_get("id")?,
        account_id: row.try_get("account_id")?,
        ruminate_minutes: row.try_get("ruminate_minutes")?,
        anxiety_level: row.try_get("anxiety_level")?,
        notes: row.try_get("notes")?,
        created_at,
        updated_at,
    })
}
