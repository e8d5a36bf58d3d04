use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_ANXIETY_LEVEL;
use crate::error::{FieldError, Result, finish_validation};
use crate::pagination::PaginationDetails;

/// A single timestamped log entry owned by exactly one account.
///
/// `id` and `account_id` are server-assigned; a request body may carry them
/// but they are never taken from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcdLog {
    pub id: Uuid,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruminate_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anxiety_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OcdLog {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.ruminate_minutes.is_some_and(|m| m < 0) {
            errors.push(FieldError::new("ruminate_minutes", "must not be negative"));
        }
        if self.anxiety_level.is_some_and(|l| !(0..=MAX_ANXIETY_LEVEL).contains(&l)) {
            errors.push(FieldError::new(
                "anxiety_level",
                format!("must be between 0 and {MAX_ANXIETY_LEVEL}"),
            ));
        }
        finish_validation(errors)
    }
}

/// One page of an account's logs, as returned by `GET /ocdlog`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    pub logs: Vec<OcdLog>,
    pub pagination: PaginationDetails,
}

/// Response body for a freshly created log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedLog {
    pub id: Uuid,
}
