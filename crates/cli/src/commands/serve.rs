use std::sync::Arc;

use anyhow::Result;
use ocdtracker_core::{AuthConfig, TrackerConfig};
use ocdtracker_http::{
    AppState, IdentityVerifier, RemoteVerifier, StaticTokenVerifier, create_router,
};
use ocdtracker_storage::PgStorage;

pub(crate) async fn run(port: Option<u16>, host: Option<String>) -> Result<()> {
    let config = TrackerConfig::from_env()?;
    let storage = Arc::new(PgStorage::new(&config.database).await?);
    let verifier = build_verifier(&config.auth, config.server.request_timeout)?;

    let state = Arc::new(AppState {
        accounts: storage.clone(),
        logs: storage,
        verifier,
        auto_create_account: config.auth.auto_create_account,
        request_timeout: config.server.request_timeout,
    });

    let router = create_router(state);
    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_verifier(
    auth: &AuthConfig,
    timeout: std::time::Duration,
) -> Result<Arc<dyn IdentityVerifier>> {
    if let Some(url) = auth.verify_url.as_deref() {
        tracing::info!(url, "verifying bearer tokens remotely");
        return Ok(Arc::new(RemoteVerifier::new(url, timeout)?));
    }
    if auth.static_tokens.is_empty() {
        anyhow::bail!(
            "set IDENTITY_VERIFY_URL or OCDTRACKER_STATIC_TOKENS to authenticate requests"
        );
    }
    tracing::warn!(tokens = auth.static_tokens.len(), "using static bearer tokens");
    Ok(Arc::new(StaticTokenVerifier::from_pairs(&auth.static_tokens)))
}
