//! Request logging utilities for upstream forwarding
//!
//! Provides structured logging with correlation IDs so one inbound request
//! can be followed through to its upstream call.

use std::time::Instant;

use reqwest::Url;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::Upstream;

/// Context for tracking one upstream call
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the upstream call started
    pub start_time: Instant,
    /// Upstream handling this request
    pub upstream: Upstream,
    /// Upstream URL without query string
    pub endpoint: String,
}

impl RequestContext {
    /// Create a new request context
    ///
    /// The query string is dropped from the logged endpoint since Gemini
    /// carries its API key there.
    pub fn new(upstream: Upstream, url: &Url) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            upstream,
            endpoint: redact_url(url),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request being sent to upstream
    pub fn log_upstream_request(&self, body_size: usize, timeout_ms: u128) {
        debug!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            endpoint = %self.endpoint,
            body_size = %body_size,
            timeout_ms = %timeout_ms,
            "Sending request to upstream"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16, body_size: usize) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            endpoint = %self.endpoint,
            status = %status,
            body_size = %body_size,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log an upstream error status
    pub fn log_upstream_error(&self, status: u16, message: &str) {
        warn!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            endpoint = %self.endpoint,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            error = %message,
            "Upstream returned an error"
        );
    }

    /// Log connection error
    pub fn log_connection_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            endpoint = %self.endpoint,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to upstream failed"
        );
    }

    /// Log timeout
    pub fn log_timeout(&self, timeout_ms: u128) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            endpoint = %self.endpoint,
            timeout_ms = %timeout_ms,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream request timed out"
        );
    }
}

/// Render a URL for logs without its query string
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    redacted.set_query(None);
    redacted.to_string()
}
