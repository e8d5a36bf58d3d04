//! Storage layer for ocdtracker
//!
//! Presence-driven statement building over PostgreSQL: entities are
//! projected onto a fixed allow-list per table, turned into parameterized
//! INSERT / UPDATE statements, and executed through per-entity repository
//! traits.

mod error;
mod kind;
mod pg_migrations;
mod pg_storage;
mod projection;
mod statement;
pub mod traits;
mod types;

pub use error::StorageError;
pub use kind::{EntityKind, EntitySpec};
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
pub use projection::{Column, Projectable, Projection, SqlValue, project};
pub use statement::{Statement, StatementError, UpdatePlan, build_insert, build_update};
pub use traits::{AccountStore, LogStore};
pub use types::UpdateOutcome;
