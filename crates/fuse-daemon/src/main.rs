//! fuse-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, loads configuration,
//! resolves the upstream token, builds the shared state, wires middleware and
//! starts the HTTP server. All route handlers live in `routes.rs`.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use fuse_config::{
    load_layered_yaml, report_unused_keys, secrets::resolve_secrets, GatewayConfig,
    UnusedKeyPolicy,
};
use fuse_daemon::{routes, state};
use fuse_md::{IexHttpProvider, MarketDataProvider};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let layers = config_paths_from_env();
    let loaded = load_layered_yaml(&layers).context("config load failed")?;
    info!(config_hash = %loaded.config_hash, layers = ?layers, "config loaded");

    let unused = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !unused.is_clean() {
        warn!(keys = ?unused.unused_leaf_pointers, "config contains keys nothing reads");
    }

    let gateway = GatewayConfig::from_config_json(&loaded.config_json)?;
    let secrets = resolve_secrets(&loaded.config_json)?;
    if secrets.iex_token.is_none() {
        warn!("no upstream token configured; calling upstream anonymously");
    }

    let provider = IexHttpProvider::new_with_base_url(
        secrets.iex_token,
        gateway.upstream.base_url.clone(),
    )
    .with_timeout(Duration::from_millis(gateway.upstream.timeout_ms))
    .context("upstream client init failed")?;
    info!(
        source = provider.source_name(),
        base_url = provider.base_url(),
        timeout_ms = gateway.upstream.timeout_ms,
        "upstream provider ready"
    );

    let shared = Arc::new(state::AppState::new(Arc::new(provider)));

    let app = routes::build_router(Arc::clone(&shared), &gateway.routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = bind_addr_from_env().unwrap_or(gateway.addr);
    info!("fuse-daemon listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind failed: {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// `FUSE_CONFIG=config/gateway.yaml,config/sandbox.yaml`. Unset or empty means
/// built-in defaults only.
fn config_paths_from_env() -> Vec<String> {
    std::env::var("FUSE_CONFIG")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("FUSE_DAEMON_ADDR").ok()?.parse().ok()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler failed; shutting down");
    }
    info!("shutdown requested");
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any)
}
