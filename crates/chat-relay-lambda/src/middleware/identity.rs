use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use lambda_http::RequestExt;
use serde_json::Value;

use chat_relay_core::models::identity::Identity;

/// Where authorizer claims live in a serialized request context: REST API
/// Cognito authorizers, HTTP API JWT authorizers, and Lambda authorizers.
const CLAIM_POINTERS: [&str; 3] = [
    "/authorizer/claims",
    "/authorizer/jwt/claims",
    "/authorizer/lambda/claims",
];

/// Attach the caller's [`Identity`] to the request extensions when the
/// gateway's authorizer supplied one.
///
/// The token was already validated upstream; the identity is only logged,
/// and its absence is not an error.
pub async fn attach_identity(mut req: Request, next: Next) -> Response {
    let identity = req
        .request_context_ref()
        .and_then(|ctx| serde_json::to_value(ctx).ok())
        .and_then(|ctx| identity_from_context(&ctx));

    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

/// Find the authorizer claim set in a serialized request context.
pub fn identity_from_context(context: &Value) -> Option<Identity> {
    CLAIM_POINTERS
        .iter()
        .filter_map(|pointer| context.pointer(pointer))
        .filter_map(Value::as_object)
        .find_map(Identity::from_claims)
}
