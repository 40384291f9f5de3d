use chat_relay_inference::client::GenerationClient;
use chat_relay_lambda::config::RelayConfig;
use chat_relay_lambda::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = RelayConfig::from_env()?;
    let generation = GenerationClient::new(config.generation_settings())?;

    tracing::info!(
        endpoint = %config.generation_url,
        max_new_tokens = config.max_new_tokens,
        timeout_secs = config.request_timeout.map(|t| t.as_secs()),
        "chat relay starting"
    );

    let app = chat_relay_lambda::router(AppState::new(generation));

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
