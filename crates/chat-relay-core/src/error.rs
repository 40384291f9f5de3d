use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    #[error("request body is missing")]
    MissingBody,

    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),
}
