//! End-to-end tests for the relay router.
//!
//! The router runs in-process via `tower::ServiceExt::oneshot`; the
//! generation service is a `wiremock` server.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chat_relay_inference::client::{GenerationClient, GenerationSettings};
use chat_relay_lambda::error::RATE_LIMIT_MESSAGE;
use chat_relay_lambda::router;
use chat_relay_lambda::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> Router {
    let client = GenerationClient::new(GenerationSettings::new(format!(
        "{}/generate",
        server.uri()
    )))
    .expect("client should build");
    router(AppState::new(client))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, headers, body)
}

async fn post_chat(app: Router, body: impl Into<Body>) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

fn assert_relay_headers(headers: &HeaderMap) {
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
    );
    assert_eq!(headers["access-control-allow-methods"], "OPTIONS,POST");
    assert_eq!(headers.get_all("content-type").iter().count(), 1);
}

async fn mock_generation(server: &MockServer, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(reply)
        .mount(server)
        .await;
}

#[tokio::test]
async fn hello_scenario_returns_reply_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_json(json!({"prompt": "Hello", "max_new_tokens": 512})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "Hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let (status, headers, body) = post_chat(app_for(&server), r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_relay_headers(&headers);
    assert_eq!(
        body,
        json!({
            "success": true,
            "response": "Hi there",
            "conversationHistory": [
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "Hi there"}
            ]
        })
    );
}

#[tokio::test]
async fn history_is_flattened_into_prompt_and_extended() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"prompt": "Q: a\nA: b\nQ: c", "max_new_tokens": 512})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "X"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = json!({
        "message": "c",
        "conversationHistory": [
            {"role": "user", "content": "a"},
            {"role": "assistant", "content": "b"}
        ]
    });
    let (status, _, body) = post_chat(app_for(&server), request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "X");
    assert_eq!(
        body["conversationHistory"],
        json!([
            {"role": "user", "content": "a"},
            {"role": "assistant", "content": "b"},
            {"role": "user", "content": "c"},
            {"role": "assistant", "content": "X"}
        ])
    );
}

#[tokio::test]
async fn unknown_roles_are_echoed_but_not_prompted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"prompt": "Q: a\nQ: c", "max_new_tokens": 512})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "X"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = json!({
        "message": "c",
        "conversationHistory": [
            {"role": "system", "content": "be brief"},
            {"role": "user", "content": "a"}
        ]
    });
    let (status, _, body) = post_chat(app_for(&server), request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversationHistory"][0], json!({"role": "system", "content": "be brief"}));
    assert_eq!(body["conversationHistory"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn falls_back_to_response_field() {
    let server = MockServer::start().await;
    mock_generation(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"generated_text": "", "response": "Y"})),
    )
    .await;

    let (status, _, body) = post_chat(app_for(&server), r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Y");
    assert_eq!(body["conversationHistory"][1]["content"], "Y");
}

#[tokio::test]
async fn empty_generation_is_a_server_error() {
    let server = MockServer::start().await;
    mock_generation(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"generated_text": "", "response": ""})),
    )
    .await;

    let (status, headers, body) = post_chat(app_for(&server), r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_relay_headers(&headers);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "No valid response content found in the model output"
    );
    assert!(body.get("conversationHistory").is_none());
}

#[tokio::test]
async fn rate_limit_is_passed_through_with_message() {
    let server = MockServer::start().await;
    mock_generation(
        &server,
        ResponseTemplate::new(429).set_body_string(r#"{"detail":"slow down"}"#),
    )
    .await;

    let (status, headers, body) = post_chat(app_for(&server), r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_relay_headers(&headers);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], RATE_LIMIT_MESSAGE);
    assert_eq!(body["details"], r#"{"detail":"slow down"}"#);
}

#[tokio::test]
async fn upstream_error_status_is_propagated() {
    let server = MockServer::start().await;
    mock_generation(&server, ResponseTemplate::new(503)).await;

    let (status, _, body) = post_chat(app_for(&server), r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "HTTP error: 503 - Service Unavailable");
    assert_eq!(body["details"], Value::Null);
}

#[tokio::test]
async fn malformed_body_is_a_server_error_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    let (status, headers, body) = post_chat(app_for(&server), "{not json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_relay_headers(&headers);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn array_body_is_a_server_error_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    let (status, headers, body) = post_chat(app_for(&server), r#"["Hello"]"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_relay_headers(&headers);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "request body must be a JSON object");
}

#[tokio::test]
async fn array_generation_reply_is_a_server_error() {
    let server = MockServer::start().await;
    mock_generation(
        &server,
        ResponseTemplate::new(200).set_body_json(json!(["hello"])),
    )
    .await;

    let (status, headers, body) = post_chat(app_for(&server), r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_relay_headers(&headers);
    assert_eq!(body["success"], false);
    assert!(body.get("conversationHistory").is_none());
}

#[tokio::test]
async fn missing_message_is_a_server_error() {
    let server = MockServer::start().await;

    let (status, _, body) = post_chat(app_for(&server), r#"{"conversationHistory":[]}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("message"));
}

#[tokio::test]
async fn empty_body_is_a_server_error() {
    let server = MockServer::start().await;

    let (status, _, body) = post_chat(app_for(&server), Body::empty()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "request body is missing");
}

#[tokio::test]
async fn unreachable_service_is_a_server_error() {
    let client =
        GenerationClient::new(GenerationSettings::new("http://127.0.0.1:1/generate")).unwrap();
    let app = router(AppState::new(client));

    let (status, headers, body) = post_chat(app, r#"{"message":"Hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_relay_headers(&headers);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn root_path_also_relays() {
    let server = MockServer::start().await;
    mock_generation(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"generated_text": "Hi"})),
    )
    .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::from(r#"{"message":"Hello"}"#))
        .unwrap();
    let (status, _, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hi");
}

#[tokio::test]
async fn preflight_returns_cors_headers() {
    let server = MockServer::start().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/chat")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_relay_headers(&headers);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn health_reports_ok() {
    let server = MockServer::start().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-relay");
}
