//! HTTP forwarder
//!
//! Carries a [`ForwardSpec`] to its upstream over a pooled `reqwest` client.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::instrument;

use super::{logging::RequestContext, FailureKind, ForwardSpec, Forwarder, UpstreamFailure, UpstreamResult};

/// Forwarder backed by a shared `reqwest::Client`
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    /// Create a new forwarder
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn failure_from_error(ctx: &RequestContext, spec: &ForwardSpec, err: reqwest::Error) -> UpstreamFailure {
        if err.is_timeout() {
            let timeout_ms = spec.timeout.as_millis();
            ctx.log_timeout(timeout_ms);
            UpstreamFailure {
                status: None,
                kind: FailureKind::Timeout,
                message: format!("{} request timed out after {}ms", spec.upstream, timeout_ms),
                raw_body: None,
            }
        } else {
            // reqwest errors carry the full URL, which may hold the Gemini key
            let detail = err.without_url().to_string();
            ctx.log_connection_error(&detail);
            UpstreamFailure {
                status: None,
                kind: FailureKind::Network,
                message: format!("Failed to reach {}: {}", spec.upstream, detail),
                raw_body: None,
            }
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip_all, fields(upstream = %spec.upstream))]
    async fn forward(&self, spec: ForwardSpec) -> UpstreamResult {
        let ctx = RequestContext::new(spec.upstream, &spec.url);

        let payload = match serde_json::to_vec(&spec.body) {
            Ok(payload) => payload,
            Err(e) => {
                return UpstreamResult::Failure(UpstreamFailure {
                    status: None,
                    kind: FailureKind::Network,
                    message: format!("Failed to encode {} request: {}", spec.upstream, e),
                    raw_body: None,
                })
            }
        };
        ctx.log_upstream_request(payload.len(), spec.timeout.as_millis());

        let response = match self
            .client
            .request(spec.method.clone(), spec.url.clone())
            .headers(spec.headers.clone())
            .timeout(spec.timeout)
            .body(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return UpstreamResult::Failure(Self::failure_from_error(&ctx, &spec, e)),
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return UpstreamResult::Failure(Self::failure_from_error(&ctx, &spec, e)),
        };
        ctx.log_upstream_response(status.as_u16(), body.len());

        if status.is_success() {
            return UpstreamResult::Success {
                status: status.as_u16(),
                content_type,
                body,
            };
        }

        // Error bodies are usually JSON; keep plain text as a string
        let raw_body = if body.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice::<Value>(&body)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())),
            )
        };
        let message = spec
            .upstream
            .failure_message(status.as_u16(), raw_body.as_ref());
        ctx.log_upstream_error(status.as_u16(), &message);

        UpstreamResult::Failure(UpstreamFailure {
            status: Some(status.as_u16()),
            kind: FailureKind::Status,
            message,
            raw_body,
        })
    }
}
