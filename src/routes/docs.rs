//! Documentation endpoints
//!
//! Serves Swagger UI and the raw OpenAPI document.
//! Protected by the `x-docs-key` header when `DOCS_API_KEY` is configured;
//! returns 404 when unauthorized to hide the endpoints.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use crate::{docs::ProxyApiDoc, AppState};

/// Middleware to protect docs endpoints with the docs key
pub async fn docs_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(expected) = state.config.docs_api_key.as_deref() else {
        // No key configured: docs are open
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get("x-docs-key")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(provided) if provided == expected => Ok(next.run(request).await),
        _ => Err(StatusCode::NOT_FOUND.into_response()),
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ProxyApiDoc::openapi())
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

/// Create the docs router
///
/// Routes:
/// - GET /docs - Swagger UI
/// - GET /docs/openapi.json - Raw OpenAPI document
///
/// Swagger UI assets are loaded from the unpkg CDN.
pub fn create_docs_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/docs", get(swagger_ui))
        .route("/docs/", get(swagger_ui))
        .route("/docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn_with_state(state, docs_auth_middleware))
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Portfolio Proxy API - Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                persistAuthorization: true
            });
        };
    </script>
</body>
</html>"#;
