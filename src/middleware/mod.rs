//! Middleware module
//!
//! Contains axum middleware for the CORS origin policy and shared-secret
//! authentication.

pub mod auth;
pub mod cors;
