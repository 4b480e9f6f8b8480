//! Prometheus metrics endpoint
//!
//! Exposes proxy metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "proxy_requests_total",
        "Total number of requests forwarded upstream"
    );
    metrics::describe_histogram!(
        "proxy_upstream_duration_seconds",
        "Upstream call duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record one forwarded request
pub fn record_upstream(route: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "proxy_requests_total",
        "route" => route.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_upstream_duration_seconds", "route" => route.to_string())
        .record(duration_secs);
}
