use anyhow::{Context, Result};
use clap::Parser;
use recap::{create_router, AppState, AudioStorage, Config, MemoryStore, OpenAiClient};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "recap", about = "Record, transcribe and summarize conversations")]
struct Args {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/recap")]
    config: String,

    /// Override the HTTP port from the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    if cfg.ai.api_key.is_none() {
        warn!("No AI API key configured; set OPENAI_API_KEY or RECAP_AI__API_KEY");
    }

    let audio = AudioStorage::new(cfg.storage.uploads_dir(), cfg.storage.max_upload_bytes)
        .context("Failed to prepare uploads directory")?;
    let ai = Arc::new(OpenAiClient::new(&cfg.ai)?);
    let store = Arc::new(MemoryStore::new());

    let state = AppState::new(store, audio, ai.clone(), ai);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
