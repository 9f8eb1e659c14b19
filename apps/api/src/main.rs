mod config;
mod deck;
mod errors;
mod generation;
mod llm_client;
mod pptx;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::deck::template::template_options;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting deck API v{}", env!("CARGO_PKG_VERSION"));

    // Backend credentials are checked per request, not here
    let llm = LlmClient::from_config(&config)?;
    info!(
        "LLM client initialized (default backend: {}, openai key: {}, perplexity key: {})",
        config.default_backend,
        config.openai_api_key.is_some(),
        config.perplexity_api_key.is_some()
    );
    info!("Templates: {}", template_options().join(", "));

    let state = AppState {
        llm,
        default_backend: config.default_backend,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
