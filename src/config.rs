//! Configuration management for the portfolio proxy
//!
//! Configuration is loaded once from environment variables at startup and
//! handed to every handler through `AppState`. Handlers never read the
//! process environment themselves.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Origin allowed when `ALLOWED_ORIGINS` is unset (Angular dev server)
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:4200";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Deployment environment reported by `/health`
    pub environment: String,
    /// Deployment region reported by `/health`
    pub region: String,

    /// Shared secret callers must present in `x-backend-api-key`
    pub backend_api_key: Option<String>,
    /// Origins allowed to read responses cross-origin
    pub allowed_origins: Vec<String>,

    /// Gemini API base URL
    pub gemini_api_url: String,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Model used when the caller does not name one
    pub gemini_default_model: String,

    /// Sanity project id, used to derive the API host
    pub sanity_project_id: Option<String>,
    /// Sanity dataset name
    pub sanity_dataset: String,
    /// Sanity API version (date string, without the leading `v`)
    pub sanity_api_version: String,
    /// Explicit Sanity API base URL, overrides the project-derived host
    pub sanity_api_url: Option<String>,
    /// Sanity token with read/write access
    pub sanity_token: Option<String>,

    /// Timeout applied to every upstream call
    pub upstream_timeout: Duration,

    /// Key protecting the API docs; docs are open when unset
    pub docs_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: var("PROXY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            environment: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
            region: var("APP_REGION").unwrap_or_else(|| "local".to_string()),

            backend_api_key: var("BACKEND_API_KEY"),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]),

            gemini_api_url: var("GEMINI_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_default_model: var("GEMINI_DEFAULT_MODEL")
                .unwrap_or_else(|| "gemini-pro".to_string()),

            sanity_project_id: var("SANITY_PROJECT_ID"),
            sanity_dataset: var("SANITY_DATASET").unwrap_or_else(|| "production".to_string()),
            sanity_api_version: var("SANITY_API_VERSION")
                .map(|v| v.trim_start_matches('v').to_string())
                .unwrap_or_else(|| "2021-10-21".to_string()),
            sanity_api_url: var("SANITY_API_URL").map(|v| v.trim_end_matches('/').to_string()),
            sanity_token: var("SANITY_TOKEN"),

            upstream_timeout: Duration::from_millis(
                var("UPSTREAM_TIMEOUT_MS")
                    .unwrap_or_else(|| "25000".to_string())
                    .parse()
                    .context("Invalid UPSTREAM_TIMEOUT_MS")?,
            ),

            docs_api_key: var("DOCS_API_KEY"),
        })
    }

    /// Base URL of the Sanity API, if it can be determined
    pub fn sanity_base_url(&self) -> Option<String> {
        if let Some(url) = &self.sanity_api_url {
            return Some(url.clone());
        }
        self.sanity_project_id
            .as_ref()
            .map(|project| format!("https://{}.api.sanity.io", project))
    }
}

/// Split a comma-separated origin list
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
