//! Parameterized INSERT / UPDATE assembly from projected entities.
//!
//! Placeholders are handed out by a single counter per statement, so the
//! `$n` sequence is always `1..=args.len()` with no gaps or repeats: keys
//! first, then projected columns.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use thiserror::Error;

use crate::projection::{Projectable, Projection, SqlValue, project};

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("unrecognized entity type '{0}'")]
    UnrecognizedEntity(String),

    #[error("{table}: expected {expected} key value(s), got {got}")]
    KeyMismatch { table: &'static str, expected: usize, got: usize },

    #[error("{table}: instance reports unknown column '{column}'")]
    UnknownColumn { table: &'static str, column: &'static str },
}

/// SQL text plus the arguments for its positional placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Statement {
    /// Append a `RETURNING` clause.
    pub fn returning(mut self, columns: &str) -> Self {
        self.sql.push_str(" RETURNING ");
        self.sql.push_str(columns);
        self
    }

    /// A `sqlx` query with every argument bound in placeholder order.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.args.iter().fold(sqlx::query(&self.sql), |query, arg| arg.bind_to(query))
    }
}

/// What an update should do once the instance has been projected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    Execute(Statement),
    /// Nothing present to set; the caller must not issue an UPDATE.
    NoFields,
}

struct Placeholders {
    issued: usize,
}

impl Placeholders {
    const fn new() -> Self {
        Self { issued: 0 }
    }

    fn next(&mut self) -> String {
        self.issued += 1;
        format!("${}", self.issued)
    }
}

fn check_keys(
    table: &'static str,
    expected: &[&'static str],
    keys: &[SqlValue],
) -> Result<(), StatementError> {
    if expected.len() == keys.len() {
        Ok(())
    } else {
        Err(StatementError::KeyMismatch { table, expected: expected.len(), got: keys.len() })
    }
}

/// Build `INSERT INTO <table> (<keys>, <present columns>) VALUES ($1, ...)`.
///
/// `keys` are the caller-supplied values of the kind's create-key columns
/// and always lead the column list, even when nothing else is present.
pub fn build_insert<E: Projectable>(
    entity: &E,
    keys: Vec<SqlValue>,
) -> Result<Statement, StatementError> {
    let spec = E::KIND.spec();
    check_keys(spec.table, spec.create_keys, &keys)?;

    let columns = project(entity)?.into_columns();
    let mut placeholders = Placeholders::new();
    let mut names: Vec<&str> = Vec::with_capacity(keys.len() + columns.len());
    let mut slots: Vec<String> = Vec::with_capacity(keys.len() + columns.len());
    let mut args = keys;

    for key in spec.create_keys {
        names.push(key);
        slots.push(placeholders.next());
    }
    for (column, value) in columns {
        names.push(column);
        slots.push(placeholders.next());
        args.push(value);
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        spec.table,
        names.join(", "),
        slots.join(", ")
    );
    Ok(Statement { sql, args })
}

/// Build `UPDATE <table> SET <col> = $k+1, ..., updated_at = CURRENT_TIMESTAMP
/// WHERE <key> = $1 [AND <key> = $2]`.
///
/// Returns [`UpdatePlan::NoFields`] when no allow-listed field is present.
pub fn build_update<E: Projectable>(
    entity: &E,
    keys: Vec<SqlValue>,
) -> Result<UpdatePlan, StatementError> {
    let spec = E::KIND.spec();
    check_keys(spec.table, spec.update_keys, &keys)?;

    let columns = match project(entity)? {
        Projection::Empty => return Ok(UpdatePlan::NoFields),
        Projection::Fields(columns) => columns,
    };

    let mut placeholders = Placeholders::new();
    let predicates: Vec<String> =
        spec.update_keys.iter().map(|key| format!("{key} = {}", placeholders.next())).collect();

    let mut assignments = Vec::with_capacity(columns.len() + 1);
    let mut args = keys;
    for (column, value) in columns {
        assignments.push(format!("{column} = {}", placeholders.next()));
        args.push(value);
    }
    assignments.push("updated_at = CURRENT_TIMESTAMP".to_owned());

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        spec.table,
        assignments.join(", "),
        predicates.join(" AND ")
    );
    Ok(UpdatePlan::Execute(Statement { sql, args }))
}
