//! Mock Gemini API for testing
//!
//! Provides wiremock-based mocks for
//! `POST /models/{model}:generateContent?key=...`.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Mock Gemini server wrapper
pub struct MockGemini {
    server: MockServer,
}

impl MockGemini {
    /// Start a new mock Gemini server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    fn generate_path(model: &str) -> String {
        format!("/models/{}:generateContent", model)
    }

    /// Sample generateContent response
    pub fn sample_response(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {
                "promptTokenCount": 4,
                "candidatesTokenCount": 7,
                "totalTokenCount": 11
            }
        })
    }

    /// Mock a successful generation for `model`, requiring the API key
    pub async fn mock_generate_success(&self, model: &str, api_key: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path(model)))
            .and(query_param("key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a Gemini error response
    pub async fn mock_generate_error(&self, model: &str, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path(model)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "code": status,
                    "message": message,
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a response slower than any test timeout
    pub async fn mock_generate_slow(&self, model: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path(model)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Self::sample_response("late"))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Fail the test if any request reaches this server
    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far
    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
