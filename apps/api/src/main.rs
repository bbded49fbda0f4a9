mod catalog;
mod config;
mod errors;
mod llm_client;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::{CompletionBackend, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Anzen API v{}", env!("CARGO_PKG_VERSION"));

    // Load the catalog snapshot. Immutable for the life of the process;
    // a load failure degrades to the stub catalog, never aborts startup.
    let catalog = Arc::new(Catalog::load_or_stub(Path::new(&config.catalog_path)));

    // Initialize the completion client
    let llm: Arc<dyn CompletionBackend> =
        Arc::new(OpenAiClient::new(config.openai_api_key.clone()));
    info!("completion client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        catalog,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
