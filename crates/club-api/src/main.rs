//! Book club API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p club-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env`.

use anyhow::Context;
use club_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = ?e, "Server failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::from_settings(&config.app)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        redis = config.redis.is_some(),
        "Starting book club API server"
    );

    club_api::run(config).await.context("Server error")?;

    Ok(())
}
