use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::config::Config;
use api::llm_client::LlmClient;
use api::routes::build_router;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rostrum API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; without a key every endpoint answers from the
    // local heuristics instead
    let llm = match &config.llm_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), &config.llm_api_url);
            info!("LLM client initialized ({})", config.llm_api_url);
            Some(client)
        }
        None => {
            warn!("LLM_API_KEY not set; scoring and question generation run on local fallbacks");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
