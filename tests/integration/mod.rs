//! Integration tests for the portfolio proxy
//!
//! These tests drive the real router with axum-test while wiremock stands
//! in for Gemini and Sanity.

mod sanity;
