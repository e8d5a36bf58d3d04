//! Per-request context assembled by middleware and read by handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ocdtracker_core::{Identity, PaginationSpec};

use crate::api_error::{ApiError, MISSING_IDENTITY};

/// What the middleware chain learned about a request.
///
/// Lives in the request extensions. Each piece is optional because a
/// handler can be reached without the middleware that fills it in.
#[derive(Debug, Clone)]
pub struct RequestContext {
    span: tracing::Span,
    identity: Option<Identity>,
    pagination: Option<PaginationSpec>,
}

impl RequestContext {
    pub fn new(span: tracing::Span) -> Self {
        Self { span, identity: None, pagination: None }
    }

    /// Logger for this request. Falls back to a fresh span when no request
    /// logger ran.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn require_identity(&self) -> Result<&Identity, ApiError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized(MISSING_IDENTITY, "no identity on request"))
    }

    pub fn pagination(&self) -> PaginationSpec {
        self.pagination.unwrap_or_default()
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.span.record("account", identity.uid.as_str());
        self.identity = Some(identity);
    }

    pub fn set_pagination(&mut self, pagination: PaginationSpec) {
        self.pagination = Some(pagination);
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(tracing::info_span!("request", account = tracing::field::Empty))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}
