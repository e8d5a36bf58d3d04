//! Middleware chain, outermost first: request logger, auth, pagination.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use ocdtracker_core::{Identity, PaginationSpec};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::AppState;
use crate::api_error::{ApiError, DATABASE_ERROR, EMPTY_BEARER_TOKEN, UNABLE_TO_VERIFY_JWT};
use crate::auth::{VerifyError, bearer_token};
use crate::context::RequestContext;

/// Open the request span, seed the context and log the outcome.
pub async fn log_request(mut req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        %method,
        %uri,
        account = tracing::field::Empty,
    );
    req.extensions_mut().insert(RequestContext::new(span.clone()));

    let response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request info"
        );
    });
    response
}

/// Resolve the bearer token to an identity and attach it to the context.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()).map(ToOwned::to_owned) else {
        return ApiError::unauthorized(EMPTY_BEARER_TOKEN, "missing bearer token").into_response();
    };

    let identity = match state.verifier.verify(&token).await {
        Ok(identity) => identity,
        Err(VerifyError::Invalid(msg)) => {
            return ApiError::unauthorized(UNABLE_TO_VERIFY_JWT, msg).into_response();
        },
        Err(err @ VerifyError::Unavailable(_)) => {
            tracing::warn!(error = %err, "identity verification failed");
            return ApiError::unauthorized(UNABLE_TO_VERIFY_JWT, "unable to verify token")
                .into_response();
        },
    };

    if state.auto_create_account && !creates_account(&req) {
        if let Err(err) = ensure_account(&state, &identity).await {
            return err.into_response();
        }
    }

    let ctx = req.extensions_mut().get_or_insert_with(RequestContext::default);
    ctx.set_identity(identity);
    next.run(req).await
}

/// `POST /account` stores its own body, so seeding would turn it into a 409.
fn creates_account(req: &Request) -> bool {
    req.method() == Method::POST && req.uri().path() == "/account"
}

/// First authenticated request creates the account row from the identity.
async fn ensure_account(state: &AppState, identity: &Identity) -> Result<(), ApiError> {
    if state.accounts.account_exists(&identity.uid).await? {
        return Ok(());
    }
    match state.accounts.create_account(&identity.uid, &identity.to_account()).await {
        Ok(()) => {
            tracing::info!(account = %identity.uid, "created account on first sign-in");
            Ok(())
        },
        // Another request won the race.
        Err(err) if err.is_duplicate() => Ok(()),
        Err(err) => Err(ApiError::internal(DATABASE_ERROR, err)),
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    limit: Option<String>,
    offset: Option<String>,
}

/// Parse `limit` / `offset` from the query string into the context.
pub async fn paginate(mut req: Request, next: Next) -> Response {
    let query = Query::<PageQuery>::try_from_uri(req.uri())
        .map(|Query(query)| query)
        .unwrap_or_default();
    let spec = PaginationSpec::from_query(query.limit.as_deref(), query.offset.as_deref());

    let ctx = req.extensions_mut().get_or_insert_with(RequestContext::default);
    ctx.set_pagination(spec);
    next.run(req).await
}
