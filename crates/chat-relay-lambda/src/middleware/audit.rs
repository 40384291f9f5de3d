use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use lambda_http::RequestExt;
use tracing::Instrument;

/// Audit logging middleware.
///
/// Wraps each invocation in a span keyed by the Lambda request id (a fresh
/// uuid when running outside Lambda) and logs one structured line per request.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let invocation_id = req
        .lambda_context_ref()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!("invocation", invocation_id = %invocation_id);

    async move {
        let response = next.run(req).await;

        let status = response.status().as_u16();
        tracing::info!(
            method = %method,
            path = %uri,
            status = status,
            "api_request"
        );

        response
    }
    .instrument(span)
    .await
}
