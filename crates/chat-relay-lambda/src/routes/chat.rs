use axum::Extension;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;
use tracing::info;

use chat_relay_core::models::chat::{ChatReply, ChatRequest};
use chat_relay_core::models::identity::Identity;
use chat_relay_core::prompt::compose_prompt;

use crate::error::ApiError;
use crate::response::json_response;
use crate::state::AppState;

/// Relay one chat message to the generation service.
///
/// The body is read raw rather than through `Json` so malformed input comes
/// back in the relay's own error shape.
pub async fn chat(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let raw = std::str::from_utf8(&body)?;
    info!(body = %raw, "received chat request");

    if let Some(Extension(identity)) = &identity {
        info!(user = identity.display_name(), "authenticated user");
    }

    let request = ChatRequest::from_body(raw)?;
    info!(
        message = %request.message,
        history_len = request.conversation_history.len(),
        "processing message"
    );

    let prompt = compose_prompt(&request.message, &request.conversation_history);
    let assistant_text = state.generation.generate(&prompt).await?;

    let history = request
        .conversation_history
        .extend_with_exchange(request.message, assistant_text.clone());

    Ok(json_response(
        StatusCode::OK,
        ChatReply::new(assistant_text, history),
    ))
}

/// CORS preflight.
pub async fn preflight() -> Response {
    json_response(StatusCode::OK, json!({}))
}
