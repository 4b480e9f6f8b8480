//! Gemini generation endpoint
//!
//! `POST /api/gemini/generate` forwards a prompt to Gemini's
//! `generateContent` and relays the raw Gemini response.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Response};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{AppError, ErrorResponse},
    proxy::gemini::GenerateRequest,
    routes::forward_and_relay,
    AppState,
};

/// Generate content with Gemini
#[utoipa::path(
    post,
    path = "/api/gemini/generate",
    tag = "Gemini",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Raw Gemini generateContent response"),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Missing x-backend-api-key", body = ErrorResponse),
        (status = 403, description = "Invalid x-backend-api-key", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "Misconfiguration or upstream failure", body = ErrorResponse)
    ),
    security(("backend_api_key" = []))
)]
#[instrument(skip_all, fields(route = "generate"))]
pub async fn generate(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, AppError> {
    let request = GenerateRequest::parse(&body).inspect_err(|e| {
        warn!(error = %e, "Rejected generate request");
    })?;

    debug!(
        model = ?request.model,
        prompt_len = request.prompt.len(),
        "Processing generate request"
    );

    let spec = request.forward_spec(&state.config).inspect_err(|e| {
        error!(error = %e, "Cannot forward generate request");
    })?;
    forward_and_relay(&state, "generate", spec).await
}
