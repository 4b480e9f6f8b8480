//! Common test utilities for the portfolio proxy
//!
//! Builds the real router against wiremock upstreams so integration tests
//! exercise CORS, auth, validation, forwarding and response mapping end to
//! end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use portfolio_proxy::{routes, AppState, Config};

use crate::mocks::{MockGemini, MockSanity, SANITY_API_VERSION, SANITY_DATASET};

/// Test configuration constants
pub mod constants {
    /// Shared secret the proxy expects
    pub const TEST_BACKEND_KEY: &str = "test-backend-key";
    /// Gemini API key held by the proxy
    pub const TEST_GEMINI_KEY: &str = "test-gemini-key";
    /// Sanity token held by the proxy
    pub const TEST_SANITY_TOKEN: &str = "test-sanity-token";
    /// Allow-listed browser origin
    pub const ALLOWED_ORIGIN: &str = "https://portfolio.example";
    /// Origin that is not allow-listed
    pub const EVIL_ORIGIN: &str = "http://evil.example";
}

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-backend-api-key");

/// Test harness wiring the real router to mock upstreams
///
/// # Example
///
/// ```ignore
/// let harness = TestHarness::new().await;
/// harness.sanity.mock_query_success(TEST_SANITY_TOKEN, r#"{"result":[]}"#).await;
///
/// let response = harness
///     .authed_post("/api/sanity/query")
///     .json(&json!({"query": "*[_type == 'post']"}))
///     .await;
/// response.assert_status_ok();
/// ```
pub struct TestHarness {
    pub server: TestServer,
    pub gemini: MockGemini,
    pub sanity: MockSanity,
}

impl TestHarness {
    /// Harness with every secret configured
    pub async fn new() -> Self {
        Self::with_config(&[], &[]).await
    }

    /// Harness with some variables overridden and some removed
    pub async fn with_config(overrides: &[(&str, &str)], removed: &[&str]) -> Self {
        let gemini = MockGemini::start().await;
        let sanity = MockSanity::start().await;

        let mut vars: HashMap<String, String> = [
            ("BACKEND_API_KEY", constants::TEST_BACKEND_KEY.to_string()),
            ("ALLOWED_ORIGINS", format!("{},http://localhost:4200", constants::ALLOWED_ORIGIN)),
            ("APP_ENV", "test".to_string()),
            ("APP_REGION", "test-region".to_string()),
            ("GEMINI_API_URL", gemini.uri()),
            ("GEMINI_API_KEY", constants::TEST_GEMINI_KEY.to_string()),
            ("SANITY_PROJECT_ID", "testproj".to_string()),
            ("SANITY_API_URL", sanity.uri()),
            ("SANITY_API_VERSION", SANITY_API_VERSION.to_string()),
            ("SANITY_DATASET", SANITY_DATASET.to_string()),
            ("SANITY_TOKEN", constants::TEST_SANITY_TOKEN.to_string()),
            ("UPSTREAM_TIMEOUT_MS", "5000".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }
        for key in removed {
            vars.remove(*key);
        }

        let config = Config::from_lookup(|key| vars.get(key).cloned())
            .expect("Failed to build test config");
        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        let app = routes::create_router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            gemini,
            sanity,
        }
    }

    /// POST with the correct backend key
    pub fn authed_post(&self, path: &str) -> TestRequest {
        self.server.post(path).add_header(
            API_KEY_HEADER,
            HeaderValue::from_static(constants::TEST_BACKEND_KEY),
        )
    }
}

/// The three proxy routes
pub const PROXY_ROUTES: [&str; 3] = [
    "/api/gemini/generate",
    "/api/sanity/query",
    "/api/sanity/mutate",
];

/// Sample request bodies
pub mod test_data {
    use serde_json::{json, Value};

    /// A valid body for each proxy route
    pub fn valid_body(route: &str) -> Value {
        match route {
            "/api/gemini/generate" => json!({ "prompt": "Write a haiku about Rust" }),
            "/api/sanity/query" => json!({ "query": "*[_type == \"project\"]" }),
            "/api/sanity/mutate" => json!({
                "mutations": [{ "create": { "_type": "message", "text": "hi" } }]
            }),
            other => panic!("unknown route {}", other),
        }
    }
}
