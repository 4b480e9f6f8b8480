//! OpenAPI specification for the proxy API
//!
//! Aggregates the proxy and health endpoints and their schemas into a
//! single OpenAPI document.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    error::ErrorResponse,
    proxy::{
        gemini::GenerateRequest,
        sanity::{MutateRequest, QueryRequest},
    },
    routes::health::{HealthResponse, HealthStatus},
};

/// OpenAPI specification for the portfolio proxy
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio Proxy API",
        version = "1.0.0",
        description = "Forwards portfolio site requests to Gemini and Sanity without exposing provider credentials"
    ),
    paths(
        crate::routes::gemini::generate,
        crate::routes::sanity::query,
        crate::routes::sanity::mutate,
        crate::routes::health::health_check
    ),
    components(
        schemas(
            GenerateRequest,
            QueryRequest,
            MutateRequest,
            ErrorResponse,
            HealthStatus,
            HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Gemini", description = "Generative AI proxy"),
        (name = "Sanity", description = "CMS proxy"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ProxyApiDoc;

/// Security scheme addon for the shared backend key
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "backend_api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-backend-api-key"))),
            );
        }
    }
}
