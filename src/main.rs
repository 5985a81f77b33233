use tracing_subscriber::EnvFilter;

use lumina_search::api;
use lumina_search::config::Config;
use lumina_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Database: {}", config.database_url);
    tracing::info!(
        "Model backend: {} ({})",
        config.llm.base_url,
        config.llm.chat_model
    );
    match &config.search.base_url {
        Some(url) => tracing::info!("Search provider: {url}"),
        None => tracing::warn!("Search provider not configured, chat will run without citations"),
    }

    let state = AppState::new(config.clone()).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
