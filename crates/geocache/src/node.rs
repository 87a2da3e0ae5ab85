//! Node runtime
//!
//! Loads configuration, initialises logging, starts the cache and keeps it
//! running until Ctrl-C.

use geocache_infrastructure::config::ConfigLoader;
use geocache_infrastructure::di::init_app;
use geocache_infrastructure::logging::{init_logging, parse_log_level};
use std::path::Path;
use tracing::info;

/// Run a GeoCache node until interrupted
///
/// `log_level` overrides the configured logging level.
pub async fn run(config_path: Option<&Path>, log_level: Option<&str>) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load()?;

    if let Some(level) = log_level {
        parse_log_level(level)?;
        config.logging.level = level.to_string();
    }
    init_logging(config.logging.clone())?;

    let context = init_app(config).await?;
    info!(
        regions = ?context.config().regions,
        "GeoCache node running; press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");

    if !context.shutdown().await {
        tracing::warn!("Some delivery workers did not stop in time");
    }
    Ok(())
}
