//! Authentication middleware
//!
//! Checks the shared backend secret presented in `x-backend-api-key`.
//! This is a single static secret, not a per-user credential: there is no
//! session, expiry or identity attached to it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{AppError, API_KEY_HEADER},
    AppState,
};

/// Outcome of checking the shared secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    MissingKey,
    InvalidKey,
    /// The server has no secret configured to compare against
    Unconfigured,
}

/// Compare a presented secret with the configured one
///
/// A missing header is reported before a missing server secret so callers
/// without a key always see 401.
pub fn authenticate(presented: Option<&str>, configured: Option<&str>) -> AuthDecision {
    match (presented, configured) {
        (None, _) => AuthDecision::MissingKey,
        (Some(_), None) => AuthDecision::Unconfigured,
        (Some(presented), Some(configured)) if presented == configured => AuthDecision::Allowed,
        (Some(_), Some(_)) => AuthDecision::InvalidKey,
    }
}

/// Authentication middleware
///
/// Runs before method and body validation on the proxy routes.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|h| h.to_str().unwrap_or_default());

    match authenticate(presented, state.config.backend_api_key.as_deref()) {
        AuthDecision::Allowed => {
            debug!("Backend API key accepted");
            Ok(next.run(request).await)
        }
        AuthDecision::MissingKey => {
            warn!("Request without backend API key rejected");
            Err(AppError::MissingApiKey)
        }
        AuthDecision::InvalidKey => {
            warn!("Request with invalid backend API key rejected");
            Err(AppError::InvalidApiKey)
        }
        AuthDecision::Unconfigured => {
            error!("BACKEND_API_KEY is not configured, rejecting proxy request");
            Err(AppError::Configuration(
                "BACKEND_API_KEY is not configured".to_string(),
            ))
        }
    }
}
