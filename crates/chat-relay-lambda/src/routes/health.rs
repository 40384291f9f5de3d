use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

use crate::response::json_response;

pub async fn health_check() -> Response {
    json_response(
        StatusCode::OK,
        json!({
            "status": "ok",
            "service": "chat-relay",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}
