use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EmptyGenerationError;

/// Body POSTed to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
}

/// Reply from the generation endpoint.
///
/// Deployments have answered with either `generated_text` or `response`;
/// both are accepted, `generated_text` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl GenerationResult {
    /// Extract the assistant text, falling back from `generated_text` to
    /// `response`. Empty strings count as absent.
    pub fn into_text(self) -> Result<String, EmptyGenerationError> {
        if let Some(text) = self.generated_text.filter(|t| !t.is_empty()) {
            return Ok(text);
        }

        warn!("empty generated_text from model, checking alternative keys");
        self.response
            .filter(|t| !t.is_empty())
            .ok_or(EmptyGenerationError)
    }
}
