//! HTTP API server for ocdtracker.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]

pub mod api_error;
pub mod auth;
mod context;
mod handlers;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use ocdtracker_storage::{AccountStore, LogStore};
use tower_http::timeout::TimeoutLayer;

pub use api_error::{ApiError, ErrorBody};
pub use auth::{IdentityVerifier, RemoteVerifier, StaticTokenVerifier, VerifyError};
pub use context::RequestContext;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub logs: Arc<dyn LogStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Create the account row on the first authenticated request.
    pub auto_create_account: bool,
    /// Upper bound on a single request, including store round trips.
    pub request_timeout: Duration,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.request_timeout;

    let api = Router::new()
        .route("/account", post(handlers::account::create_account))
        .route(
            "/account/me",
            get(handlers::account::get_account)
                .patch(handlers::account::update_account)
                .delete(handlers::account::delete_account),
        )
        .route(
            "/ocdlog",
            get(handlers::ocdlog::list_logs)
                .post(handlers::ocdlog::create_log)
                .delete(handlers::ocdlog::delete_all_logs)
                .layer(axum::middleware::from_fn(middleware::paginate)),
        )
        .route(
            "/ocdlog/{id}",
            get(handlers::ocdlog::get_log)
                .patch(handlers::ocdlog::update_log)
                .delete(handlers::ocdlog::delete_log),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::authenticate,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
