//! graha-rg - Report Generation Service
//!
//! Synthesizes paginated horoscope and match PDF reports from facts computed
//! by the external chart-computation provider.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use graha_rg::assets::AssetCache;
use graha_rg::config::{self, DEFAULT_PORT};
use graha_rg::services::fact_client::HttpFactProvider;
use graha_rg::AppState;

#[derive(Parser, Debug)]
#[command(name = "graha-rg", version, about = "GRAHA report generation service")]
struct Args {
    /// Listen port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Explicit config file path (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting graha-rg (Report Generation)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml = graha_common::config::load_service_config("graha-rg", args.config.as_deref())?;
    let config = config::resolve(&toml)?;
    info!("Provider: {}", config.provider_url);
    info!("Assets: {}", config.assets_dir.display());

    let provider = HttpFactProvider::new(
        &config.provider_url,
        &config.provider_user_id,
        &config.provider_api_key,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create provider client: {}", e))?;
    let assets = AssetCache::new(&config.assets_dir);

    let state = AppState::new(Arc::new(provider), Arc::new(assets));
    let app = graha_rg::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
