use std::sync::Arc;

use llama_relay::chat_db::ChatDbClient;
use llama_relay::config::AppConfig;
use llama_relay::handlers::AppState;
use llama_relay::llm::{create_provider, CompletionProvider};
use llama_relay::routes::configure_routes;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let store = ChatDbClient::new(config.database.clone()).await?;
    store.ensure_schema().await?;
    info!(host = %config.database.host, database = %config.database.database, "Connected to chat store");

    let upstream: Arc<dyn CompletionProvider> = Arc::from(create_provider(config.upstream.clone())?);
    info!(url = %config.upstream.completion_url(), "Using model server");

    let state = AppState::new(Arc::new(store), upstream);
    let routes = configure_routes(state, &config.cors_origins);

    info!("Starting server on http://{}", config.bind_addr);
    warp::serve(routes).run(config.bind_addr).await;

    Ok(())
}
