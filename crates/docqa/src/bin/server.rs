//! Document Q&A server binary
//!
//! Run with: cargo run -p docqa --bin docqa-server -- --config docqa.toml

use clap::Parser;
use docqa::{config::DocQaConfig, server::DocQaServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docqa-server", version, about = "OCR document question answering server")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the configuration file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            DocQaConfig::load(path)?
        }
        None => DocQaConfig::default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload directory: {}", config.upload.upload_dir.display());
    tracing::info!("  - Allowed extensions: {}", config.upload.allowed_extensions.join(", "));
    tracing::info!("  - OCR language: {}", config.ocr.language);
    tracing::info!(
        "  - OCR page segmentation modes: {:?}",
        config.ocr.page_segmentation_modes
    );

    let server = DocQaServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload    - Upload document images");
    println!("  POST /api/ask       - Ask questions");
    println!("  POST /api/search    - Search extracted text");
    println!("  GET  /api/documents - List documents");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
