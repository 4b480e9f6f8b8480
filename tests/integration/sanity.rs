//! Sanity endpoint integration tests
//!
//! - POST /api/sanity/query - GROQ forwarding and verbatim relay
//! - POST /api/sanity/mutate - mutation validation and error explanations

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants::*, TestHarness};

// =============================================================================
// POST /api/sanity/query
// =============================================================================

#[tokio::test]
async fn test_query_relays_body_verbatim() {
    let harness = TestHarness::new().await;
    harness
        .sanity
        .mock_query_success(TEST_SANITY_TOKEN, r#"{"result": []}"#)
        .await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({"query": "*[_type == \"project\"]"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), r#"{"result": []}"#);
    let body: Value = response.json();
    assert_eq!(body, json!({"result": []}));
}

#[tokio::test]
async fn test_query_forwards_query_and_params() {
    let harness = TestHarness::new().await;
    harness
        .sanity
        .mock_query_success(TEST_SANITY_TOKEN, r#"{"result": {"title": "Home"}}"#)
        .await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({
            "query": "*[slug.current == $slug][0]",
            "params": {"slug": "home"}
        }))
        .await;

    response.assert_status_ok();
    let received = harness.sanity.received().await;
    let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        sent,
        json!({"query": "*[slug.current == $slug][0]", "params": {"slug": "home"}})
    );
}

#[tokio::test]
async fn test_query_without_query_is_400() {
    let harness = TestHarness::new().await;
    harness.sanity.expect_no_calls().await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({"params": {}}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_query_without_token_is_500_and_makes_no_call() {
    let harness = TestHarness::with_config(&[], &["SANITY_TOKEN"]).await;
    harness.sanity.expect_no_calls().await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({"query": "*"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFIGURATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("SANITY_TOKEN"));
    assert!(harness.sanity.received().await.is_empty());
}

#[tokio::test]
async fn test_query_without_project_is_500() {
    let harness =
        TestHarness::with_config(&[], &["SANITY_API_URL", "SANITY_PROJECT_ID"]).await;
    harness.sanity.expect_no_calls().await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({"query": "*"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("SANITY_PROJECT_ID"));
}

#[tokio::test]
async fn test_query_upstream_error_is_wrapped() {
    let harness = TestHarness::new().await;
    let upstream_error = json!({
        "error": {
            "description": "expected ']' following array body",
            "type": "queryParseError"
        }
    });
    harness
        .sanity
        .mock_query_error(400, upstream_error.clone())
        .await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({"query": "*[_type == 'post'"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(
        body["error"],
        "Sanity query failed: expected ']' following array body"
    );
    assert_eq!(body["details"], upstream_error);
}

#[tokio::test]
async fn test_query_timeout_is_500_with_timeout_code() {
    let harness = TestHarness::with_config(&[("UPSTREAM_TIMEOUT_MS", "200")], &[]).await;
    harness.sanity.mock_query_slow(Duration::from_secs(3)).await;

    let response = harness
        .authed_post("/api/sanity/query")
        .json(&json!({"query": "*"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_TIMEOUT");
}

// =============================================================================
// POST /api/sanity/mutate
// =============================================================================

#[tokio::test]
async fn test_mutate_forwards_mutations_in_order() {
    let harness = TestHarness::new().await;
    let upstream = json!({
        "transactionId": "tx-1",
        "results": [{"id": "msg-1", "operation": "create"}]
    });
    harness
        .sanity
        .mock_mutate_success(TEST_SANITY_TOKEN, upstream.clone())
        .await;

    let mutations = json!([
        {"create": {"_type": "message", "text": "hello"}},
        {"patch": {"id": "stats", "inc": {"messages": 1}}}
    ]);
    let response = harness
        .authed_post("/api/sanity/mutate")
        .json(&json!({"mutations": mutations}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, upstream);

    let received = harness.sanity.received().await;
    let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(sent["mutations"], mutations);
}

#[tokio::test]
async fn test_mutate_with_empty_mutations_is_400() {
    let harness = TestHarness::new().await;
    harness.sanity.expect_no_calls().await;

    let response = harness
        .authed_post("/api/sanity/mutate")
        .json(&json!({"mutations": []}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mutate_with_non_array_mutations_is_400() {
    let harness = TestHarness::new().await;
    harness.sanity.expect_no_calls().await;

    for mutations in [json!("delete everything"), json!({"create": {}}), json!(7)] {
        let response = harness
            .authed_post("/api/sanity/mutate")
            .json(&json!({"mutations": mutations}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_mutate_upstream_auth_errors_are_explained() {
    let cases = [
        (401, "Sanity token is invalid or expired"),
        (403, "Sanity token does not have write permission"),
        (400, "Invalid mutation payload"),
    ];

    for (status, expected) in cases {
        let harness = TestHarness::new().await;
        harness
            .sanity
            .mock_mutate_error(status, json!({"error": {"description": "upstream says no"}}))
            .await;

        let response = harness
            .authed_post("/api/sanity/mutate")
            .json(&json!({"mutations": [{"delete": {"id": "x"}}]}))
            .await;

        response.assert_status(StatusCode::from_u16(status).unwrap());
        let body: Value = response.json();
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with(expected), "{} -> {}", status, message);
        assert_eq!(body["details"]["error"]["description"], "upstream says no");
    }
}

#[tokio::test]
async fn test_mutate_without_token_is_500_and_makes_no_call() {
    let harness = TestHarness::with_config(&[], &["SANITY_TOKEN"]).await;
    harness.sanity.expect_no_calls().await;

    let response = harness
        .authed_post("/api/sanity/mutate")
        .json(&json!({"mutations": [{"delete": {"id": "x"}}]}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.sanity.received().await.is_empty());
}
