//! Furqan HTTP server entry point
//!
//! Loads the corpus, starts the REST API and builds the first search
//! index generation in the background. Search endpoints answer 503
//! until that generation is published.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use furqan::core::config::Config;
use furqan::core::services::Services;
use furqan::core::xdg::XdgDirs;
use furqan::http::build_router;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "furqan=info,tower_http=debug".into());
    let json = std::env::var("FURQAN_LOG_JSON")
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!("Starting furqan corpus API");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let config = Config::load()?;
    config.log_config();

    // Load the corpus (seeding it on first start)
    let services = Arc::new(Services::load(config.clone())?);

    // Index in the background; searches return 503 until it lands
    let indexer = Arc::clone(&services);
    tokio::task::spawn_blocking(move || {
        if let Err(e) = indexer.build_index() {
            tracing::error!("Failed to build search index: {}", e);
        }
    });

    let app = build_router(services);

    // Bind to address and start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
