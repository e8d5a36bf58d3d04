//! Closed mapping from entity kind to table layout.

use std::fmt;
use std::str::FromStr;

use crate::statement::StatementError;

/// Every persisted entity type. Adding a variant forces a new [`EntitySpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Account,
    OcdLog,
}

/// Static table layout of one entity kind.
#[derive(Debug)]
pub struct EntitySpec {
    pub table: &'static str,
    /// Columns a caller may set through create / partial update, in the
    /// order they are emitted.
    pub allowed: &'static [&'static str],
    /// Columns supplied by the caller on insert, ahead of the allow-list.
    pub create_keys: &'static [&'static str],
    /// Predicates of the `WHERE` clause on update, in placeholder order.
    pub update_keys: &'static [&'static str],
    /// Server-owned columns that callers can never write.
    pub managed: &'static [&'static str],
}

impl EntitySpec {
    /// Whether `column` belongs to this table at all.
    pub fn knows(&self, column: &str) -> bool {
        self.allowed
            .iter()
            .chain(self.create_keys)
            .chain(self.update_keys)
            .chain(self.managed)
            .any(|c| *c == column)
    }
}

static ACCOUNT_SPEC: EntitySpec = EntitySpec {
    table: "account",
    allowed: &[
        "email",
        "display_name",
        "wake_time",
        "sleep_time",
        "notification_interval",
        "photo_url",
    ],
    create_keys: &["id"],
    update_keys: &["id"],
    managed: &["created_at", "updated_at"],
};

static OCDLOG_SPEC: EntitySpec = EntitySpec {
    table: "ocdlog",
    allowed: &["ruminate_minutes", "anxiety_level", "notes"],
    create_keys: &["account_id"],
    update_keys: &["account_id", "id"],
    managed: &["id", "created_at", "updated_at"],
};

impl EntityKind {
    pub const ALL: [Self; 2] = [Self::Account, Self::OcdLog];

    pub fn spec(self) -> &'static EntitySpec {
        match self {
            Self::Account => &ACCOUNT_SPEC,
            Self::OcdLog => &OCDLOG_SPEC,
        }
    }

    pub fn table(self) -> &'static str {
        self.spec().table
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for EntityKind {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.table().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatementError::UnrecognizedEntity(s.to_owned()))
    }
}
