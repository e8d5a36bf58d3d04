use serde::{Deserialize, Serialize};

use crate::account::Account;

/// The authenticated principal behind a request, as resolved by the
/// identity collaborator. `uid` is the account key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into(), email: None, display_name: None, photo_url: None }
    }

    /// Seed profile used when an account is created on first sign-in.
    pub fn to_account(&self) -> Account {
        Account {
            id: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
            ..Account::default()
        }
    }
}
