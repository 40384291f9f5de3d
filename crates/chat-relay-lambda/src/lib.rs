//! chat-relay-lambda
//!
//! Lambda entry point: relays a chat message plus caller-held history to the
//! generation service and returns the reply merged into the history.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};

pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the relay router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/",
            post(routes::chat::chat).options(routes::chat::preflight),
        )
        .route(
            "/chat",
            post(routes::chat::chat).options(routes::chat::preflight),
        )
        .layer(axum_mw::from_fn(middleware::identity::attach_identity))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .with_state(state)
}
