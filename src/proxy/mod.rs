//! Proxy module
//!
//! Handles request forwarding to the upstream services (Gemini and Sanity).
//!
//! Each route goes through the same three steps:
//! 1. an adapter validates the inbound body and builds a [`ForwardSpec`]
//!    (pure, no I/O)
//! 2. a [`Forwarder`] performs exactly one upstream call and folds the
//!    outcome into an [`UpstreamResult`]
//! 3. [`relay`] turns the result into the outbound response

pub mod client;
pub mod gemini;
pub mod headers;
pub mod logging;
pub mod sanity;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use reqwest::{header::HeaderMap, Method, Url};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

pub use client::HttpForwarder;

/// Upstream API a request is forwarded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Gemini,
    SanityQuery,
    SanityMutate,
}

impl Upstream {
    /// Name used in logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Upstream::Gemini => "gemini",
            Upstream::SanityQuery => "sanity_query",
            Upstream::SanityMutate => "sanity_mutate",
        }
    }

    /// Describe an upstream error response in caller-facing terms
    ///
    /// Each upstream reports errors in its own shape; this folds them into
    /// a single message.
    pub fn failure_message(&self, status: u16, body: Option<&Value>) -> String {
        match self {
            Upstream::Gemini => gemini::failure_message(status, body),
            Upstream::SanityQuery => sanity::query_failure_message(status, body),
            Upstream::SanityMutate => sanity::mutate_failure_message(status, body),
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to perform one upstream call
#[derive(Debug, Clone)]
pub struct ForwardSpec {
    pub upstream: Upstream,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Value,
    pub timeout: Duration,
}

/// Why an upstream call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The upstream answered with a non-success status
    Status,
    /// The call did not complete within the configured timeout
    Timeout,
    /// The call failed before a response arrived (DNS, connect, TLS, body read)
    Network,
}

/// A failed upstream call
#[derive(Debug, Clone)]
pub struct UpstreamFailure {
    /// Upstream status code, if a response arrived
    pub status: Option<u16>,
    pub kind: FailureKind,
    pub message: String,
    /// Upstream error body, relayed to the caller as `details`
    pub raw_body: Option<Value>,
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of a single upstream call
#[derive(Debug, Clone)]
pub enum UpstreamResult {
    Success {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    Failure(UpstreamFailure),
}

impl UpstreamResult {
    /// Label for metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            UpstreamResult::Success { .. } => "success",
            UpstreamResult::Failure(f) => match f.kind {
                FailureKind::Status => "error",
                FailureKind::Timeout => "timeout",
                FailureKind::Network => "unavailable",
            },
        }
    }
}

/// Trait for anything that can carry a [`ForwardSpec`] to its upstream
///
/// # Security
///
/// Implementations MUST NOT forward inbound headers; the `ForwardSpec` headers are
/// the only ones sent upstream.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Get the forwarder name for logging
    fn name(&self) -> &'static str;

    /// Perform exactly one upstream call, never retrying
    async fn forward(&self, spec: ForwardSpec) -> UpstreamResult;
}

/// Map an upstream result to the outbound response
///
/// Success relays status and body verbatim; failure becomes
/// [`AppError::Upstream`].
pub fn relay(result: UpstreamResult) -> AppResult<Response> {
    match result {
        UpstreamResult::Success {
            status,
            content_type,
            body,
        } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
            let content_type = content_type
                .and_then(|ct| HeaderValue::from_str(&ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static("application/json"));

            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
        }
        UpstreamResult::Failure(failure) => Err(AppError::Upstream(failure)),
    }
}

/// Parse a request body into a JSON object
pub fn parse_json_object(body: &[u8]) -> AppResult<Map<String, Value>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is required".to_string()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!(
            "Request body is not valid JSON: {}",
            e
        ))),
    }
}

/// Pull a required, non-empty string field out of a request body
pub fn required_string(body: &Map<String, Value>, field: &str) -> AppResult<String> {
    match body.get(field) {
        None | Some(Value::Null) => Err(AppError::BadRequest(format!(
            "Missing required field: {}",
            field
        ))),
        Some(Value::String(s)) if s.trim().is_empty() => Err(AppError::BadRequest(format!(
            "Field '{}' must not be empty",
            field
        ))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AppError::BadRequest(format!(
            "Field '{}' must be a string",
            field
        ))),
    }
}

/// Pull an optional object field out of a request body
pub fn optional_object(body: &Map<String, Value>, field: &str) -> AppResult<Option<Map<String, Value>>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(_) => Err(AppError::BadRequest(format!(
            "Field '{}' must be an object",
            field
        ))),
    }
}
