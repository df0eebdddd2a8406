//! Gatekeeper - JWT Authentication & Relay API
//! Mission: Registration, token-based login, and authenticated passthrough
//! endpoints with a full per-request audit trail

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatekeeper_backend::{
    api::{create_router, AppState},
    auth::{TokenService, UserStore},
    config::Config,
    upstream::JsonPlaceholderClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let store = Arc::new(UserStore::new());
    let tokens = Arc::new(TokenService::new(
        config.secret_key.clone(),
        config.token_ttl_minutes,
    ));
    let relay = Arc::new(
        JsonPlaceholderClient::new(Duration::from_secs(config.upstream_timeout_secs))?
            .with_base_url(config.upstream_base_url.clone()),
    );

    let app = create_router(
        AppState {
            store,
            tokens,
            relay,
        },
        config.audit_log_raw_tokens,
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🎯 API server listening on {}", addr);
    info!(
        "📝 Audit log: {} (raw tokens: {})",
        config.audit_log_path, config.audit_log_raw_tokens
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Console layer plus an append-only audit file layer; every audit record
/// lands in both sinks.
fn init_tracing(config: &Config) -> Result<()> {
    let audit_file = gatekeeper_backend::config::open_audit_log(&config.audit_log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(audit_file)),
        )
        .init();

    Ok(())
}
