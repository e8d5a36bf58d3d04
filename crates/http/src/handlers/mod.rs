#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod account;
pub mod ocdlog;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;

use crate::api_error::{ApiError, INVALID_ID, INVALID_REQUEST_BODY};

/// Unwrap a JSON body, turning any rejection into `invalid-request-body`.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(INVALID_REQUEST_BODY, rejection.body_text()))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|e| ApiError::bad_request(INVALID_ID, format!("'{raw}' is not a valid id: {e}")))
}
