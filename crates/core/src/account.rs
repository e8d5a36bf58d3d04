use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NOTIFICATION_INTERVAL;
use crate::error::{FieldError, Result, finish_validation};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// 24-hour clock, hours and minutes (`7:05`, `23:59`).
static TIME_OF_DAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(2[0-3]|[01]?[0-9]):([0-5]?[0-9])$").unwrap());

/// A user profile keyed by the externally issued identity id.
///
/// Every mutable attribute is optional: `None` means "not supplied" and is
/// never written to the database as NULL by a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_interval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Check every present field against its rule. Absent fields always pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(email) = self.email.as_deref() {
            if !EMAIL_REGEX.is_match(email) {
                errors.push(FieldError::new("email", "must be a valid email address"));
            }
        }
        if let Some(wake) = self.wake_time.as_deref() {
            if !is_time_of_day(wake) {
                errors.push(FieldError::new("wake_time", "must be a 24-hour HH:MM time"));
            }
        }
        if let Some(sleep) = self.sleep_time.as_deref() {
            if !is_time_of_day(sleep) {
                errors.push(FieldError::new("sleep_time", "must be a 24-hour HH:MM time"));
            }
        }
        if let Some(interval) = self.notification_interval {
            if !(0..=MAX_NOTIFICATION_INTERVAL).contains(&interval) {
                errors.push(FieldError::new(
                    "notification_interval",
                    format!("must be between 0 and {MAX_NOTIFICATION_INTERVAL}"),
                ));
            }
        }
        finish_validation(errors)
    }
}

pub fn is_time_of_day(value: &str) -> bool {
    TIME_OF_DAY_REGEX.is_match(value)
}
