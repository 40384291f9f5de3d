use std::error::Error;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use chat_relay_core::error::CoreError;
use chat_relay_inference::error::InferenceError;

use crate::response::json_response;

pub const RATE_LIMIT_MESSAGE: &str =
    "The generation API rate limit has been reached. Please wait a moment and try again.";

/// Failure surfaced to the caller.
#[derive(Debug)]
pub enum ApiError {
    /// The generation service answered with a non-2xx status; it is passed
    /// through with the service's error body as `details`.
    Upstream {
        status: u16,
        reason: String,
        body: String,
    },
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct UpstreamErrorBody {
    success: bool,
    error: String,
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream {
                status,
                reason,
                body,
            } => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let error = if code == StatusCode::TOO_MANY_REQUESTS {
                    RATE_LIMIT_MESSAGE.to_string()
                } else {
                    format!("HTTP error: {status} - {reason}")
                };
                tracing::error!(status, reason = %reason, details = %body, "upstream error");

                json_response(
                    code,
                    UpstreamErrorBody {
                        success: false,
                        error,
                        details: (!body.is_empty()).then_some(body),
                    },
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        error: msg,
                    },
                )
            }
        }
    }
}

/// Log the full source chain of `err` and keep its top-level message.
fn internal(err: &dyn Error) -> ApiError {
    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    tracing::error!(error = %err, caused_by = ?chain, "relay failed");
    ApiError::Internal(err.to_string())
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        internal(&e)
    }
}

impl From<InferenceError> for ApiError {
    fn from(e: InferenceError) -> Self {
        match e {
            InferenceError::Status {
                status,
                reason,
                body,
            } => ApiError::Upstream {
                status,
                reason,
                body,
            },
            other => internal(&other),
        }
    }
}

impl From<std::str::Utf8Error> for ApiError {
    fn from(e: std::str::Utf8Error) -> Self {
        internal(&e)
    }
}
