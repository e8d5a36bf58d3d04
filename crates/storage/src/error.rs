//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (not found, duplicate, statement
//! contract violations, driver errors) instead of downcasting.

use thiserror::Error;

use crate::statement::StatementError;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for an identity-scoped lookup.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation (account created twice).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Foreign key violation (log written for an account that does not exist).
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// The statement builder refused its input. Never caused by a
    /// well-formed caller.
    #[error("statement error: {0}")]
    Statement(#[from] StatementError),

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// Startup handshake gave up after its fixed number of attempts.
    #[error("reached max database connection retry attempts ({attempts})")]
    ConnectRetriesExhausted {
        attempts: u32,
        #[source]
        last: sqlx::Error,
    },
}

impl StorageError {
    /// Whether this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// SQLSTATE 23505 becomes `Duplicate` and 23503 `ForeignKey`. `RowNotFound`
/// becomes a generic `NotFound`; everything else stays `Database`.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23505") => {
                Self::Duplicate(db_err.message().to_owned())
            },
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23503") => {
                Self::ForeignKey(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}
