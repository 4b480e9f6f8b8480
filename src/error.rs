//! Error types for the portfolio proxy
//!
//! Every failure a request can hit is an `AppError`; the `IntoResponse`
//! impl is the single place where errors become HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::proxy::{FailureKind, UpstreamFailure};

/// Header carrying the shared backend secret
pub const API_KEY_HEADER: &str = "x-backend-api-key";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing x-backend-api-key header")]
    MissingApiKey,

    #[error("Invalid backend API key")]
    InvalidApiKey,

    #[error("Method {0} not allowed, use POST")]
    MethodNotAllowed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server misconfiguration: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(UpstreamFailure),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Upstream error payload, when the failure came from Gemini or Sanity
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey => StatusCode::UNAUTHORIZED,
            AppError::InvalidApiKey => StatusCode::FORBIDDEN,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(failure) => failure
                .status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingApiKey => "MISSING_API_KEY",
            AppError::InvalidApiKey => "INVALID_API_KEY",
            AppError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Upstream(failure) => match failure.kind {
                FailureKind::Status => "UPSTREAM_ERROR",
                FailureKind::Timeout => "UPSTREAM_TIMEOUT",
                FailureKind::Network => "UPSTREAM_UNAVAILABLE",
            },
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let display = self.to_string();

        let (message, details) = match self {
            AppError::MissingApiKey | AppError::InvalidApiKey => (display, None),
            AppError::MethodNotAllowed(_) => (display, None),
            AppError::BadRequest(msg) | AppError::NotFound(msg) => (msg, None),
            AppError::Configuration(msg) => (msg, None),
            AppError::Upstream(failure) => (failure.message, failure.raw_body),
            // Internal details stay in the logs
            AppError::Internal(_) => ("Internal server error".to_string(), None),
        };

        let body = ErrorResponse {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
