//! HTTP routes for the portfolio proxy
//!
//! This module defines all HTTP endpoints exposed by the proxy.

pub mod docs;
pub mod gemini;
pub mod health;
pub mod metrics;
pub mod sanity;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{Method, Uri},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    middleware::{auth::auth_middleware, cors::cors_middleware},
    proxy::{relay, ForwardSpec},
    routes::metrics::record_upstream,
    AppState,
};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Proxy routes: auth wraps the method router, so a missing or wrong key
    // is reported before a wrong method
    let protected_routes = Router::new()
        .route(
            "/api/gemini/generate",
            post(gemini::generate).fallback(method_not_allowed),
        )
        .route(
            "/api/sanity/query",
            post(sanity::query).fallback(method_not_allowed),
        )
        .route(
            "/api/sanity/mutate",
            post(sanity::mutate).fallback(method_not_allowed),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes - no auth required
    let public_routes = Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(docs::create_docs_router(state.clone()))
        .fallback(not_found)
        // CORS runs before everything else so preflight never hits auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Forward a validated request and relay the upstream answer
///
/// Shared by every proxy route.
pub async fn forward_and_relay(state: &AppState, route: &'static str, spec: ForwardSpec) -> AppResult<Response> {
    let start_time = Instant::now();
    let upstream = spec.upstream;

    let result = state.forwarder.forward(spec).await;

    let duration = start_time.elapsed().as_secs_f64();
    record_upstream(route, result.outcome(), duration);

    info!(
        route = %route,
        upstream = %upstream,
        forwarder = %state.forwarder.name(),
        outcome = %result.outcome(),
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Proxy request completed"
    );

    relay(result)
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
