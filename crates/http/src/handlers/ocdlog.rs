use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ocdtracker_core::{CreatedLog, LogPage, OcdLog};
use ocdtracker_storage::UpdateOutcome;

use super::{parse_body, parse_id};
use crate::AppState;
use crate::api_error::ApiError;
use crate::context::RequestContext;

fn validated(body: Result<Json<OcdLog>, JsonRejection>) -> Result<OcdLog, ApiError> {
    let log = parse_body(body)?;
    log.validate()?;
    Ok(log)
}

pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Json<LogPage>, ApiError> {
    let identity = ctx.require_identity()?;
    let page = state.logs.list_logs(&identity.uid, ctx.pagination()).await?;
    Ok(Json(page))
}

pub async fn delete_all_logs(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<StatusCode, ApiError> {
    let identity = ctx.require_identity()?;
    state.logs.delete_all_logs(&identity.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_log(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    body: Result<Json<OcdLog>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedLog>), ApiError> {
    let log = validated(body)?;
    let identity = ctx.require_identity()?;
    let id = state.logs.create_log(&identity.uid, &log).await?;
    Ok((StatusCode::CREATED, Json(CreatedLog { id })))
}

pub async fn get_log(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<OcdLog>, ApiError> {
    let id = parse_id(&id)?;
    let identity = ctx.require_identity()?;
    let log = state.logs.get_log(&identity.uid, id).await?;
    Ok(Json(log))
}

pub async fn update_log(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Result<Json<OcdLog>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let log = validated(body)?;
    let identity = ctx.require_identity()?;
    if !state.logs.log_exists(&identity.uid, id).await? {
        return Err(ApiError::not_found(format!("ocdlog '{id}' not found")));
    }
    if let UpdateOutcome::NoFields = state.logs.update_log(&identity.uid, id, &log).await? {
        tracing::debug!(parent: ctx.span(), log = %id, "log patch carried no fields");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Deleting a log the caller does not own removes nothing and still succeeds.
pub async fn delete_log(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let identity = ctx.require_identity()?;
    state.logs.delete_log(&identity.uid, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
