use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::InferenceError;
use crate::generation::{GenerationRequest, GenerationResult};

/// Token budget requested from the generation service unless overridden.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

/// Settings for [`GenerationClient`].
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Full URL of the generate endpoint.
    pub endpoint: String,
    pub max_new_tokens: u32,
    /// Whole-request timeout. `None` waits for the service indefinitely.
    pub timeout: Option<Duration>,
}

impl GenerationSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            timeout: None,
        }
    }
}

/// HTTP client for the remote generation endpoint.
///
/// Every call is a single attempt; failures are returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
    max_new_tokens: u32,
}

impl GenerationClient {
    pub fn new(settings: GenerationSettings) -> Result<Self, InferenceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| InferenceError::Config(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint,
            max_new_tokens: settings.max_new_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `prompt` to the generation service and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            max_new_tokens: self.max_new_tokens,
        };
        let payload = serde_json::to_string(&request)?;

        info!(endpoint = %self.endpoint, payload = %payload, "calling generation service");

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(InferenceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                reason = %reason,
                body = %body,
                "generation service returned an error"
            );
            return Err(InferenceError::Status {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        let raw = response.text().await.map_err(InferenceError::Transport)?;
        info!(response = %raw, "generation service response");

        let result = decode_result(&raw)?;

        Ok(result.into_text()?)
    }
}

/// Decode the reply body, which must be a JSON object.
fn decode_result(raw: &str) -> Result<GenerationResult, InferenceError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| InferenceError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(InferenceError::Decode(
            "expected a JSON object from the generation service".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| InferenceError::Decode(e.to_string()))
}
