//! Portfolio Proxy - credential-shielding proxy for Gemini and Sanity
//!
//! This is the main entry point for the proxy server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};

use portfolio_proxy::{routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting portfolio proxy");

    // Load configuration
    let config = Config::from_env()?;
    log_configuration(&config);

    // Initialize metrics
    routes::metrics::init_metrics();
    info!("Metrics initialized");

    let state = Arc::new(AppState::new(config.clone())?);

    let app = routes::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Portfolio proxy shutdown complete");
    Ok(())
}

/// Initialize tracing; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_proxy=info,tower_http=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }
}

/// Missing secrets only fail the routes that need them, so flag them early
fn log_configuration(config: &Config) {
    info!(
        environment = %config.environment,
        region = %config.region,
        allowed_origins = ?config.allowed_origins,
        upstream_timeout_ms = %config.upstream_timeout.as_millis(),
        "Configuration loaded"
    );

    if config.backend_api_key.is_none() {
        warn!("BACKEND_API_KEY is not set; all proxy routes will answer 500");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; /api/gemini/generate will answer 500");
    }
    if config.sanity_token.is_none() || config.sanity_base_url().is_none() {
        warn!("Sanity is not fully configured; /api/sanity/* will answer 500");
    }
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown");
        }
    }
}
