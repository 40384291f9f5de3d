use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// The generation service answered with a non-2xx status.
    #[error("HTTP error: {status} - {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("request to generation service failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("generation response parsing failed: {0}")]
    Decode(String),

    #[error(transparent)]
    EmptyGeneration(#[from] EmptyGenerationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client config error: {0}")]
    Config(String),
}

/// Neither `generated_text` nor `response` carried any text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No valid response content found in the model output")]
pub struct EmptyGenerationError;
