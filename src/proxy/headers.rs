//! Header utilities for upstream requests
//!
//! Upstream requests carry only the headers built here. Inbound headers,
//! including the caller's `x-backend-api-key`, are never forwarded.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{AppError, AppResult};

/// Headers for upstreams that authenticate through the URL (Gemini)
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Headers for upstreams that take a bearer token (Sanity)
pub fn bearer_headers(token: &str) -> AppResult<HeaderMap> {
    let mut headers = json_headers();

    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        AppError::Configuration("SANITY_TOKEN contains characters not valid in a header".to_string())
    })?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);

    Ok(headers)
}
