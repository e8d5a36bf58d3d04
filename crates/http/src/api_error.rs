//! Typed API error for HTTP handlers.
//!
//! Every failure leaves the service as `{"slug": ..., "message": ...}` with a
//! status code picked by the variant. Handlers return `Result<_, ApiError>`
//! and let `?` do the mapping from storage and validation errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ocdtracker_core::TrackerError;
use ocdtracker_storage::StorageError;
use serde::{Deserialize, Serialize};

pub const INVALID_REQUEST_BODY: &str = "invalid-request-body";
pub const INVALID_ID: &str = "invalid-id";
pub const EMPTY_BEARER_TOKEN: &str = "empty-bearer-token";
pub const UNABLE_TO_VERIFY_JWT: &str = "unable-to-verify-jwt";
pub const MISSING_IDENTITY: &str = "missing-identity";
pub const NOT_FOUND: &str = "not-found";
pub const ALREADY_EXISTS: &str = "already-exists";
pub const DATABASE_ERROR: &str = "database-error";
pub const INTERNAL_SERVER_ERROR: &str = "internal-server-error";

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub slug: String,
    pub message: String,
}

/// API error with a stable slug and a human-readable message.
///
/// `Internal` logs the real error server-side and returns a static message
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400: malformed body, failed validation, unparsable id.
    BadRequest { slug: &'static str, message: String },
    /// 401: no token, a token that does not verify, or no identity.
    Unauthorized { slug: &'static str, message: String },
    /// 404: the resource is absent or not owned by the caller.
    NotFound { slug: &'static str, message: String },
    /// 409: the resource already exists.
    Conflict { slug: &'static str, message: String },
    /// 500: store failure or a programming error. Details logged, not exposed.
    Internal { slug: &'static str, source: anyhow::Error },
}

impl ApiError {
    pub fn bad_request(slug: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest { slug, message: message.into() }
    }

    pub fn unauthorized(slug: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized { slug, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { slug: NOT_FOUND, message: message.into() }
    }

    pub fn internal(slug: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal { slug, source: source.into() }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::BadRequest { slug, .. }
            | Self::Unauthorized { slug, .. }
            | Self::NotFound { slug, .. }
            | Self::Conflict { slug, .. }
            | Self::Internal { slug, .. } => slug,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (slug, message) = match self {
            Self::BadRequest { slug, message }
            | Self::Unauthorized { slug, message }
            | Self::NotFound { slug, message }
            | Self::Conflict { slug, message } => {
                tracing::warn!(slug, status = status.as_u16(), error = %message, "request failed");
                (slug, message)
            },
            Self::Internal { slug, source } => {
                tracing::error!(
                    slug,
                    status = status.as_u16(),
                    error = ?source,
                    "internal server error"
                );
                (slug, "internal server error".to_owned())
            },
        };
        (status, Json(ErrorBody { slug: slug.to_owned(), message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => {
                Self::not_found(format!("{entity} '{id}' not found"))
            },
            StorageError::Duplicate(msg) => Self::Conflict { slug: ALREADY_EXISTS, message: msg },
            // Only log rows reference another table: the owning account is gone.
            StorageError::ForeignKey(_) => Self::not_found("account not found"),
            StorageError::Statement(_) => Self::internal(INTERNAL_SERVER_ERROR, err),
            _ => Self::internal(DATABASE_ERROR, err),
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(_) | TrackerError::InvalidInput(_) => {
                Self::bad_request(INVALID_REQUEST_BODY, err.to_string())
            },
            TrackerError::Config(_) => Self::internal(INTERNAL_SERVER_ERROR, err),
        }
    }
}
