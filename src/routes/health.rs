//! Health and service description endpoints
//!
//! - `/health` - liveness with deployment info, no auth
//! - `/` - static description of the service and its routes

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    pub environment: String,
    pub region: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// One route in the service description
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub auth: bool,
}

/// Service description served at `/`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Ok,
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: state.config.environment.clone(),
        region: state.config.region.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Service description endpoint
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: env!("CARGO_PKG_DESCRIPTION"),
        endpoints: vec![
            EndpointInfo {
                method: "POST",
                path: "/api/gemini/generate",
                description: "Generate content with Google Gemini",
                auth: true,
            },
            EndpointInfo {
                method: "POST",
                path: "/api/sanity/query",
                description: "Run a GROQ query against Sanity",
                auth: true,
            },
            EndpointInfo {
                method: "POST",
                path: "/api/sanity/mutate",
                description: "Apply mutations to Sanity documents",
                auth: true,
            },
            EndpointInfo {
                method: "GET",
                path: "/health",
                description: "Health check",
                auth: false,
            },
            EndpointInfo {
                method: "GET",
                path: "/metrics",
                description: "Prometheus metrics",
                auth: false,
            },
        ],
    })
}
