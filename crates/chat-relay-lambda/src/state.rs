use chat_relay_inference::client::GenerationClient;

/// Shared application state, injected into route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub generation: GenerationClient,
}

impl AppState {
    pub fn new(generation: GenerationClient) -> Self {
        Self { generation }
    }
}
