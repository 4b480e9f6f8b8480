//! Sanity endpoints
//!
//! - `POST /api/sanity/query` - GROQ query against the configured dataset
//! - `POST /api/sanity/mutate` - ordered mutations against the dataset
//!
//! Both relay Sanity's raw JSON response.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Response};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{AppError, ErrorResponse},
    proxy::sanity::{MutateRequest, QueryRequest},
    routes::forward_and_relay,
    AppState,
};

/// Run a GROQ query
#[utoipa::path(
    post,
    path = "/api/sanity/query",
    tag = "Sanity",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Raw Sanity query response"),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Missing x-backend-api-key", body = ErrorResponse),
        (status = 403, description = "Invalid x-backend-api-key", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "Misconfiguration or upstream failure", body = ErrorResponse)
    ),
    security(("backend_api_key" = []))
)]
#[instrument(skip_all, fields(route = "query"))]
pub async fn query(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, AppError> {
    let request = QueryRequest::parse(&body).inspect_err(|e| {
        warn!(error = %e, "Rejected query request");
    })?;

    debug!(
        query_len = request.query.len(),
        has_params = request.params.is_some(),
        "Processing query request"
    );

    let spec = request.forward_spec(&state.config).inspect_err(|e| {
        error!(error = %e, "Cannot forward query request");
    })?;
    forward_and_relay(&state, "query", spec).await
}

/// Apply mutations
#[utoipa::path(
    post,
    path = "/api/sanity/mutate",
    tag = "Sanity",
    request_body = MutateRequest,
    responses(
        (status = 200, description = "Raw Sanity mutate response"),
        (status = 400, description = "Invalid request body or mutation payload", body = ErrorResponse),
        (status = 401, description = "Missing x-backend-api-key, or Sanity token invalid", body = ErrorResponse),
        (status = 403, description = "Invalid x-backend-api-key, or Sanity token without write access", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "Misconfiguration or upstream failure", body = ErrorResponse)
    ),
    security(("backend_api_key" = []))
)]
#[instrument(skip_all, fields(route = "mutate"))]
pub async fn mutate(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, AppError> {
    let request = MutateRequest::parse(&body).inspect_err(|e| {
        warn!(error = %e, "Rejected mutate request");
    })?;

    debug!(
        mutation_count = request.mutations.len(),
        "Processing mutate request"
    );

    let spec = request.forward_spec(&state.config).inspect_err(|e| {
        error!(error = %e, "Cannot forward mutate request");
    })?;
    forward_and_relay(&state, "mutate", spec).await
}
