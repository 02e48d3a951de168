use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use client_api::config::{self, Cli};
use client_api::{api, db, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init(&cli)?;
    logging::init(&config);
    info!("Initializing client API...");

    // Initialize the client store
    let store = db::init(&config, cli.in_memory).await?;

    let app = api::router(store, &config)?;

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
