//! Field projection: which allow-listed columns does an instance carry?
//!
//! Entities expose their present optional fields directly through
//! [`Projectable`]; nothing is serialized to discover presence.

use ocdtracker_core::{Account, OcdLog};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use uuid::Uuid;

use crate::kind::EntityKind;
use crate::statement::StatementError;

/// A typed value destined for a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    Uuid(Uuid),
}

impl SqlValue {
    /// Bind this value as the next positional argument of `query`.
    pub fn bind_to<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            Self::Text(s) => query.bind(s.as_str()),
            Self::Int(i) => query.bind(*i),
            Self::Uuid(u) => query.bind(*u),
        }
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// A `(column, value)` pair produced by projection.
pub type Column = (&'static str, SqlValue);

/// An entity whose optional attributes can be inspected for presence.
pub trait Projectable {
    const KIND: EntityKind;

    /// Every optional attribute currently present, paired with its column.
    fn present_fields(&self) -> Vec<Column>;
}

fn push_present<T>(fields: &mut Vec<Column>, column: &'static str, value: Option<&T>)
where
    T: Clone + Into<SqlValue>,
{
    if let Some(v) = value {
        fields.push((column, v.clone().into()));
    }
}

impl Projectable for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn present_fields(&self) -> Vec<Column> {
        let mut fields = Vec::new();
        push_present(&mut fields, "email", self.email.as_ref());
        push_present(&mut fields, "display_name", self.display_name.as_ref());
        push_present(&mut fields, "photo_url", self.photo_url.as_ref());
        push_present(&mut fields, "wake_time", self.wake_time.as_ref());
        push_present(&mut fields, "sleep_time", self.sleep_time.as_ref());
        push_present(&mut fields, "notification_interval", self.notification_interval.as_ref());
        fields
    }
}

impl Projectable for OcdLog {
    const KIND: EntityKind = EntityKind::OcdLog;

    fn present_fields(&self) -> Vec<Column> {
        let mut fields = Vec::new();
        push_present(&mut fields, "ruminate_minutes", self.ruminate_minutes.as_ref());
        push_present(&mut fields, "anxiety_level", self.anxiety_level.as_ref());
        push_present(&mut fields, "notes", self.notes.as_ref());
        fields
    }
}

/// Outcome of projecting an instance onto its allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// No allow-listed field is present: nothing to write.
    Empty,
    /// Present allow-listed fields, in allow-list order.
    Fields(Vec<Column>),
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_columns(self) -> Vec<Column> {
        match self {
            Self::Empty => Vec::new(),
            Self::Fields(columns) => columns,
        }
    }
}

/// Project `entity` onto its kind's allow-list.
///
/// Emission follows the allow-list order, not the order the entity reports
/// its fields in. A reported column that the table does not know at all is
/// a malformed instance and fails; known but non-mutable columns are
/// dropped.
pub fn project<E: Projectable>(entity: &E) -> Result<Projection, StatementError> {
    let spec = E::KIND.spec();
    let present = entity.present_fields();

    if let Some((column, _)) = present.iter().find(|(column, _)| !spec.knows(column)) {
        return Err(StatementError::UnknownColumn { table: spec.table, column: *column });
    }

    // Allow-list drives the outer loop: output order is the allow-list's.
    let mut columns = Vec::with_capacity(present.len());
    for allowed in spec.allowed {
        for (column, value) in &present {
            if column == allowed {
                columns.push((*column, value.clone()));
            }
        }
    }

    if columns.is_empty() { Ok(Projection::Empty) } else { Ok(Projection::Fields(columns)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rogue;

    impl Projectable for Rogue {
        const KIND: EntityKind = EntityKind::Account;

        fn present_fields(&self) -> Vec<Column> {
            vec![("email", "a@b.co".into()), ("password_hash", "x".into())]
        }
    }

    struct ReadOnly;

    impl Projectable for ReadOnly {
        const KIND: EntityKind = EntityKind::OcdLog;

        fn present_fields(&self) -> Vec<Column> {
            vec![("created_at", "2024-01-01".into()), ("notes", "kept".into())]
        }
    }

    #[test]
    fn empty_instance_projects_to_empty() {
        assert_eq!(project(&Account::default()).unwrap(), Projection::Empty);
        assert_eq!(project(&OcdLog::default()).unwrap(), Projection::Empty);
    }

    #[test]
    fn follows_allow_list_order() {
        // photo_url is reported before wake_time but comes last in the allow-list.
        let account = Account {
            photo_url: Some("https://img/1.png".to_owned()),
            wake_time: Some("7:00".to_owned()),
            email: Some("a@b.co".to_owned()),
            ..Account::default()
        };
        let columns: Vec<_> =
            project(&account).unwrap().into_columns().into_iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["email", "wake_time", "photo_url"]);
    }

    #[test]
    fn absent_fields_are_skipped_not_nulled() {
        let log = OcdLog {
            ruminate_minutes: Some(1),
            notes: Some("x".to_owned()),
            ..OcdLog::default()
        };
        let columns = project(&log).unwrap().into_columns();
        assert_eq!(
            columns,
            vec![("ruminate_minutes", SqlValue::Int(1)), ("notes", SqlValue::Text("x".to_owned()))]
        );
    }

    #[test]
    fn ids_on_the_body_are_never_projected() {
        let log = OcdLog {
            id: Uuid::new_v4(),
            account_id: "someone-else".to_owned(),
            anxiety_level: Some(3),
            ..OcdLog::default()
        };
        let columns = project(&log).unwrap().into_columns();
        assert_eq!(columns, vec![("anxiety_level", SqlValue::Int(3))]);
    }

    #[test]
    fn unknown_column_is_an_error_not_a_no_op() {
        let err = project(&Rogue).unwrap_err();
        assert!(matches!(
            err,
            StatementError::UnknownColumn { table: "account", column: "password_hash" }
        ));
    }

    #[test]
    fn known_managed_columns_are_dropped() {
        let columns = project(&ReadOnly).unwrap().into_columns();
        assert_eq!(columns, vec![("notes", SqlValue::Text("kept".to_owned()))]);
    }
}
