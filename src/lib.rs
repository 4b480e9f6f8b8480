//! Portfolio Proxy - credential-shielding proxy for Gemini and Sanity
//!
//! This library provides the core functionality for the proxy server.
//! It authenticates browser calls with a shared secret, applies the CORS
//! origin policy and forwards validated payloads upstream using
//! server-held credentials.

pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::proxy::{Forwarder, HttpForwarder};

/// Application state shared across all request handlers
///
/// Everything here is read-only after startup; requests share no mutable
/// state.
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Forwarder carrying validated requests to Gemini and Sanity
    pub forwarder: Arc<dyn Forwarder>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Per-request timeouts come from the config; the pool is shared
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .build()?;

        let forwarder: Arc<dyn Forwarder> = Arc::new(HttpForwarder::new(http_client));

        Ok(Self::with_forwarder(config, forwarder))
    }

    /// Create an application state around an existing forwarder
    pub fn with_forwarder(config: Config, forwarder: Arc<dyn Forwarder>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            forwarder,
        }
    }
}
