//! Gemini adapter
//!
//! Validates `/api/gemini/generate` bodies and turns them into
//! `generateContent` calls. The API key travels as the `key` query
//! parameter, never in a header the browser could see.

use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{headers::json_headers, optional_object, parse_json_object, required_string, ForwardSpec, Upstream};
use crate::{
    config::Config,
    error::{AppError, AppResult},
};

/// Body accepted by `POST /api/gemini/generate`
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Prompt text sent to the model
    pub prompt: String,
    /// Model name, defaults to the configured model (`gemini-pro`)
    #[serde(default)]
    pub model: Option<String>,
    /// Generation settings forwarded verbatim
    #[serde(default, rename = "generationConfig")]
    #[schema(value_type = Option<Object>)]
    pub generation_config: Option<Map<String, Value>>,
}

impl GenerateRequest {
    /// Validate a raw request body
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        let body = parse_json_object(body)?;

        let prompt = required_string(&body, "prompt")?;

        let model = match body.get("model") {
            None | Some(Value::Null) => None,
            Some(Value::String(m)) if m.trim().is_empty() => None,
            Some(Value::String(m)) => {
                let m = m.trim();
                if !is_valid_model_name(m) {
                    return Err(AppError::BadRequest(format!("Invalid model name: {}", m)));
                }
                Some(m.to_string())
            }
            Some(_) => {
                return Err(AppError::BadRequest(
                    "Field 'model' must be a string".to_string(),
                ))
            }
        };

        let generation_config = optional_object(&body, "generationConfig")?;

        Ok(Self {
            prompt,
            model,
            generation_config,
        })
    }

    /// Build the upstream call for this request
    ///
    /// Fails with a configuration error when no Gemini key is set.
    pub fn forward_spec(&self, config: &Config) -> AppResult<ForwardSpec> {
        let api_key = config.gemini_api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("GEMINI_API_KEY is not configured".to_string())
        })?;

        let model = self
            .model
            .as_deref()
            .unwrap_or(&config.gemini_default_model);
        let model = model.strip_prefix("models/").unwrap_or(model);

        let mut url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            config.gemini_api_url, model
        ))
        .map_err(|e| AppError::Configuration(format!("Invalid GEMINI_API_URL: {}", e)))?;
        url.query_pairs_mut().append_pair("key", api_key);

        let mut body = json!({
            "contents": [{
                "parts": [{ "text": self.prompt }]
            }]
        });
        if let Some(generation_config) = &self.generation_config {
            body["generationConfig"] = Value::Object(generation_config.clone());
        }

        Ok(ForwardSpec {
            upstream: Upstream::Gemini,
            method: Method::POST,
            url,
            headers: json_headers(),
            body,
            timeout: config.upstream_timeout,
        })
    }
}

/// Model names end up in the URL path
fn is_valid_model_name(model: &str) -> bool {
    let name = model.strip_prefix("models/").unwrap_or(model);
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

/// Gemini errors look like `{"error": {"code", "message", "status"}}`
pub fn failure_message(status: u16, body: Option<&Value>) -> String {
    let detail = body.and_then(|b| {
        b.pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| b.as_str())
    });

    match detail {
        Some(detail) => format!("Gemini API error: {}", detail),
        None => format!("Gemini API request failed with status {}", status),
    }
}
