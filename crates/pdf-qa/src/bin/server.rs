//! Question-answering server binary
//!
//! Run with: GEMINI_API_KEY=... cargo run -p pdf-qa --bin pdf-qa-server

use clap::Parser;
use pdf_qa::{config::QaConfig, server::QaServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Answer questions from a folder of PDF documents
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => QaConfig::from_file(path)?,
        None => QaConfig::default(),
    }
    .apply_env_overrides()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Document folder: {}", config.documents.folder.display());
    tracing::info!("  - Text cache: {}", config.documents.cache_path.display());
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Parallel requests: {}", config.llm.parallel_requests);

    let server = QaServer::new(config).await?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /init   - Re-extract all PDFs");
    tracing::info!("  POST /query  - Ask a question");
    tracing::info!("  GET  /health - Liveness check");

    server.start().await?;

    Ok(())
}
