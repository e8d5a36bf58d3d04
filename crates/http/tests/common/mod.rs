//! In-memory store and request helpers shared by the HTTP tests.

#![allow(clippy::unwrap_used, reason = "test code")]
#![allow(dead_code, reason = "not every test file uses every helper")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use ocdtracker_core::{Account, Identity, LogPage, OcdLog, PaginationSpec};
use ocdtracker_http::{AppState, ErrorBody, StaticTokenVerifier, create_router};
use ocdtracker_storage::{AccountStore, LogStore, StorageError, UpdateOutcome, project};
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use uuid::Uuid;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<String, Account>>,
    logs: Mutex<Vec<OcdLog>>,
}

fn overlay<T: Clone>(target: &mut Option<T>, patch: &Option<T>) {
    if patch.is_some() {
        target.clone_from(patch);
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, id: &str, account: &Account) -> Result<(), StorageError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(id) {
            return Err(StorageError::Duplicate(format!("account {id}")));
        }
        let stored = Account { id: id.to_owned(), ..account.clone() };
        accounts.insert(id.to_owned(), stored);
        Ok(())
    }

    async fn get_account(&self, id: &str) -> Result<Account, StorageError> {
        self.accounts
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound { entity: "account", id: id.to_owned() })
    }

    async fn update_account(
        &self,
        id: &str,
        account: &Account,
    ) -> Result<UpdateOutcome, StorageError> {
        if project(account)?.is_empty() {
            return Ok(UpdateOutcome::NoFields);
        }
        let mut accounts = self.accounts.lock().unwrap();
        let Some(stored) = accounts.get_mut(id) else {
            return Ok(UpdateOutcome::Applied { rows: 0 });
        };
        overlay(&mut stored.email, &account.email);
        overlay(&mut stored.display_name, &account.display_name);
        overlay(&mut stored.photo_url, &account.photo_url);
        overlay(&mut stored.wake_time, &account.wake_time);
        overlay(&mut stored.sleep_time, &account.sleep_time);
        overlay(&mut stored.notification_interval, &account.notification_interval);
        Ok(UpdateOutcome::Applied { rows: 1 })
    }

    async fn delete_account(&self, id: &str) -> Result<u64, StorageError> {
        Ok(u64::from(self.accounts.lock().unwrap().remove(id).is_some()))
    }

    async fn account_exists(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.accounts.lock().unwrap().contains_key(id))
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn create_log(&self, account_id: &str, log: &OcdLog) -> Result<Uuid, StorageError> {
        if !self.accounts.lock().unwrap().contains_key(account_id) {
            return Err(StorageError::ForeignKey("ocdlog_account_id_fkey".to_owned()));
        }
        let id = Uuid::new_v4();
        let stored = OcdLog { id, account_id: account_id.to_owned(), ..log.clone() };
        self.logs.lock().unwrap().push(stored);
        Ok(id)
    }

    async fn get_log(&self, account_id: &str, id: Uuid) -> Result<OcdLog, StorageError> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.account_id == account_id && l.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound { entity: "ocdlog", id: id.to_string() })
    }

    async fn update_log(
        &self,
        account_id: &str,
        id: Uuid,
        log: &OcdLog,
    ) -> Result<UpdateOutcome, StorageError> {
        if project(log)?.is_empty() {
            return Ok(UpdateOutcome::NoFields);
        }
        let mut logs = self.logs.lock().unwrap();
        let Some(stored) = logs.iter_mut().find(|l| l.account_id == account_id && l.id == id)
        else {
            return Ok(UpdateOutcome::Applied { rows: 0 });
        };
        overlay(&mut stored.ruminate_minutes, &log.ruminate_minutes);
        overlay(&mut stored.anxiety_level, &log.anxiety_level);
        overlay(&mut stored.notes, &log.notes);
        Ok(UpdateOutcome::Applied { rows: 1 })
    }

    async fn delete_log(&self, account_id: &str, id: Uuid) -> Result<u64, StorageError> {
        let mut logs = self.logs.lock().unwrap();
        let before = logs.len();
        logs.retain(|l| !(l.account_id == account_id && l.id == id));
        Ok((before - logs.len()) as u64)
    }

    async fn delete_all_logs(&self, account_id: &str) -> Result<u64, StorageError> {
        let mut logs = self.logs.lock().unwrap();
        let before = logs.len();
        logs.retain(|l| l.account_id != account_id);
        Ok((before - logs.len()) as u64)
    }

    async fn log_exists(&self, account_id: &str, id: Uuid) -> Result<bool, StorageError> {
        Ok(self.logs.lock().unwrap().iter().any(|l| l.account_id == account_id && l.id == id))
    }

    async fn list_logs(
        &self,
        account_id: &str,
        page: PaginationSpec,
    ) -> Result<LogPage, StorageError> {
        let logs = self.logs.lock().unwrap();
        let owned: Vec<&OcdLog> = logs.iter().filter(|l| l.account_id == account_id).collect();
        let window: Vec<OcdLog> = owned
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|l| (*l).clone())
            .collect();
        Ok(LogPage {
            pagination: page.details(window.len() as u64, owned.len() as u64),
            logs: window,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_app(auto_create_account: bool) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let verifier = StaticTokenVerifier::new()
        .with_identity(ALICE_TOKEN, Identity {
            uid: "alice".to_owned(),
            email: Some("alice@example.com".to_owned()),
            display_name: Some("Alice".to_owned()),
            photo_url: Some("https://img.example/alice.png".to_owned()),
        })
        .with_identity(BOB_TOKEN, Identity::new("bob"));
    let state = Arc::new(AppState {
        accounts: Arc::clone(&store) as Arc<dyn AccountStore>,
        logs: Arc::clone(&store) as Arc<dyn LogStore>,
        verifier: Arc::new(verifier),
        auto_create_account,
        request_timeout: Duration::from_secs(5),
    });
    TestApp { router: create_router(state), store }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_owned()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(req).await.unwrap()
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect_error(response: Response<Body>, status: StatusCode, slug: &str) {
    assert_eq!(response.status(), status);
    let body: ErrorBody = json_body(response).await;
    assert_eq!(body.slug, slug);
}
