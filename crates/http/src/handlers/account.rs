use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use ocdtracker_core::Account;
use ocdtracker_storage::UpdateOutcome;

use super::parse_body;
use crate::AppState;
use crate::api_error::ApiError;
use crate::context::RequestContext;

fn validated(body: Result<Json<Account>, JsonRejection>) -> Result<Account, ApiError> {
    let account = parse_body(body)?;
    account.validate()?;
    Ok(account)
}

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    body: Result<Json<Account>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let account = validated(body)?;
    let identity = ctx.require_identity()?;
    state.accounts.create_account(&identity.uid, &account).await?;
    Ok(StatusCode::CREATED)
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Json<Account>, ApiError> {
    let identity = ctx.require_identity()?;
    let account = state.accounts.get_account(&identity.uid).await?;
    Ok(Json(account))
}

pub async fn update_account(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    body: Result<Json<Account>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let account = validated(body)?;
    let identity = ctx.require_identity()?;
    if !state.accounts.account_exists(&identity.uid).await? {
        return Err(ApiError::not_found(format!("account '{}' not found", identity.uid)));
    }
    if let UpdateOutcome::NoFields = state.accounts.update_account(&identity.uid, &account).await? {
        tracing::debug!(parent: ctx.span(), "account patch carried no fields");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Removes every log owned by the caller, then the account itself.
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<StatusCode, ApiError> {
    let identity = ctx.require_identity()?;
    let logs = state.logs.delete_all_logs(&identity.uid).await?;
    state.accounts.delete_account(&identity.uid).await?;
    tracing::info!(parent: ctx.span(), logs, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}
