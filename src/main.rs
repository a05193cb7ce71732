//! Review analyzer - sentiment-annotated restaurant review service
//!
//! Loads a CSV dataset of reviews at startup and serves it over HTTP,
//! filtered by date range and location, with per-review sentiment scores.
//!
//! Module structure:
//! - `domain/` - Core types (Review, SentimentScores, known cities)
//! - `io/` - External interfaces (CSV store, HTTP endpoint)
//! - `services/` - Business logic (dates, filtering, sentiment, submission)
//! - `infra/` - Infrastructure (Config, logging)

use clap::Parser;
use review_analyzer::infra::{self, Config};
use review_analyzer::io::start_server;
use review_analyzer::services::ReviewService;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Review analyzer - filtered, sentiment-annotated review listing
#[derive(Parser, Debug)]
#[command(name = "review-analyzer", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logging format comes from config, so load it first
    let config_path = args.config.unwrap_or_else(|| Config::resolve_config_path(&[]));
    let config = Config::load_from_path(&config_path);
    infra::logging::init(config.log_json());

    info!(git_hash = %env!("GIT_HASH"), "review-analyzer starting");
    info!(
        config_file = %config.config_file(),
        bind_address = %config.bind_address(),
        port = %config.port(),
        reviews_file = %config.reviews_file(),
        invalid_date_policy = %config.invalid_date_policy().as_str(),
        lexicon_file = ?config.lexicon_file(),
        max_body_bytes = %config.max_body_bytes(),
        "config_loaded"
    );

    let service = Arc::new(ReviewService::from_config(&config)?);

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    start_server(&config, service, shutdown_rx).await?;

    info!("review-analyzer shutdown complete");
    Ok(())
}
