//! CORS origin policy
//!
//! Policy:
//! - no `Origin` header: wildcard `Access-Control-Allow-Origin: *`
//! - allow-listed origin: echoed back with credentials allowed
//! - any other origin: no CORS headers at all; the browser blocks the
//!   response, non-browser callers are unaffected
//!
//! `OPTIONS` requests are answered here with an empty 200 and never reach
//! authentication or the handlers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::AppState;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, x-backend-api-key";
const MAX_AGE_SECONDS: &str = "86400";

/// Which CORS headers a response gets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// No origin (or a `*` allow-list): wildcard, no credentials
    Wildcard,
    /// Allow-listed origin, echoed back with credentials
    Echo(HeaderValue),
    /// Origin not allowed: emit nothing
    Deny,
}

/// Decide the CORS headers for a request origin
pub fn decide_origin(origin: Option<&HeaderValue>, allowed: &[String]) -> OriginDecision {
    let Some(origin) = origin else {
        return OriginDecision::Wildcard;
    };

    if allowed.iter().any(|a| a == "*") {
        return OriginDecision::Wildcard;
    }

    match origin.to_str() {
        Ok(value) if allowed.iter().any(|a| a == value) => OriginDecision::Echo(origin.clone()),
        _ => OriginDecision::Deny,
    }
}

/// Write the CORS headers for a decision
pub fn apply_cors_headers(headers: &mut HeaderMap, decision: &OriginDecision) {
    let allow_origin = match decision {
        OriginDecision::Wildcard => HeaderValue::from_static("*"),
        OriginDecision::Echo(origin) => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
            origin.clone()
        }
        OriginDecision::Deny => return,
    };

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECONDS),
    );
}

/// CORS middleware, applied to the whole router
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let decision = decide_origin(
        request.headers().get(header::ORIGIN),
        &state.config.allowed_origins,
    );

    if decision == OriginDecision::Deny {
        debug!(
            origin = ?request.headers().get(header::ORIGIN),
            "Origin not allow-listed, omitting CORS headers"
        );
    }

    // Preflight short-circuit
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        apply_cors_headers(response.headers_mut(), &decision);
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), &decision);
    response
}
