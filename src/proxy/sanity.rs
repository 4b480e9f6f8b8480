//! Sanity adapter
//!
//! Validates `/api/sanity/query` and `/api/sanity/mutate` bodies and turns
//! them into calls against the Sanity HTTP API, authenticated with the
//! server-held token.

use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{headers::bearer_headers, optional_object, parse_json_object, required_string, ForwardSpec, Upstream};
use crate::{
    config::Config,
    error::{AppError, AppResult},
};

/// Body accepted by `POST /api/sanity/query`
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// GROQ query, forwarded as an opaque string
    pub query: String,
    /// Query parameters
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub params: Option<Map<String, Value>>,
}

impl QueryRequest {
    /// Validate a raw request body
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        let body = parse_json_object(body)?;

        Ok(Self {
            query: required_string(&body, "query")?,
            params: optional_object(&body, "params")?,
        })
    }

    /// Build the upstream call for this request
    pub fn forward_spec(&self, config: &Config) -> AppResult<ForwardSpec> {
        let mut body = json!({ "query": self.query });
        if let Some(params) = &self.params {
            body["params"] = Value::Object(params.clone());
        }

        sanity_spec(config, Upstream::SanityQuery, "query", body)
    }
}

/// Body accepted by `POST /api/sanity/mutate`
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct MutateRequest {
    /// Sanity mutations (create, patch, delete, ...) forwarded in order
    #[schema(value_type = Vec<Object>)]
    pub mutations: Vec<Value>,
}

impl MutateRequest {
    /// Validate a raw request body
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        let body = parse_json_object(body)?;

        let mutations = match body.get("mutations") {
            None | Some(Value::Null) => {
                return Err(AppError::BadRequest(
                    "Missing required field: mutations".to_string(),
                ))
            }
            Some(Value::Array(items)) if items.is_empty() => {
                return Err(AppError::BadRequest(
                    "Field 'mutations' must not be empty".to_string(),
                ))
            }
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(AppError::BadRequest(
                    "Field 'mutations' must be an array".to_string(),
                ))
            }
        };

        Ok(Self { mutations })
    }

    /// Build the upstream call for this request
    pub fn forward_spec(&self, config: &Config) -> AppResult<ForwardSpec> {
        let body = json!({ "mutations": self.mutations });
        sanity_spec(config, Upstream::SanityMutate, "mutate", body)
    }
}

/// Shared builder for `data/{action}/{dataset}` calls
fn sanity_spec(config: &Config, upstream: Upstream, action: &str, body: Value) -> AppResult<ForwardSpec> {
    let token = config
        .sanity_token
        .as_deref()
        .ok_or_else(|| AppError::Configuration("SANITY_TOKEN is not configured".to_string()))?;
    let base = config.sanity_base_url().ok_or_else(|| {
        AppError::Configuration("SANITY_PROJECT_ID is not configured".to_string())
    })?;

    let url = Url::parse(&format!(
        "{}/v{}/data/{}/{}",
        base, config.sanity_api_version, action, config.sanity_dataset
    ))
    .map_err(|e| AppError::Configuration(format!("Invalid Sanity API URL: {}", e)))?;

    Ok(ForwardSpec {
        upstream,
        method: Method::POST,
        url,
        headers: bearer_headers(token)?,
        body,
        timeout: config.upstream_timeout,
    })
}

/// Sanity reports errors as `{"error": {"description"}}`, `{"message"}`
/// or `{"error": "..."}` depending on the endpoint
fn describe(body: Option<&Value>) -> Option<String> {
    let body = body?;
    body.pointer("/error/description")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.as_str())
        .map(str::to_string)
}

/// Message for a failed query
pub fn query_failure_message(status: u16, body: Option<&Value>) -> String {
    match describe(body) {
        Some(detail) => format!("Sanity query failed: {}", detail),
        None => format!("Sanity query failed with status {}", status),
    }
}

/// Message for a failed mutation
///
/// Auth and payload rejections get an explanation since they usually point
/// at the token rather than the request.
pub fn mutate_failure_message(status: u16, body: Option<&Value>) -> String {
    let hint = match status {
        401 => Some("Sanity token is invalid or expired"),
        403 => Some("Sanity token does not have write permission"),
        400 => Some("Invalid mutation payload"),
        _ => None,
    };

    match (hint, describe(body)) {
        (Some(hint), Some(detail)) => format!("{}: {}", hint, detail),
        (Some(hint), None) => hint.to_string(),
        (None, Some(detail)) => format!("Sanity mutation failed: {}", detail),
        (None, None) => format!("Sanity mutation failed with status {}", status),
    }
}
