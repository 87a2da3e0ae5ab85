//! GeoCache - Entry Point
//!
//! Runs a single node hosting every configured region.

use clap::Parser;
use geocache::run;

/// Command line interface for a GeoCache node
#[derive(Parser, Debug)]
#[command(name = "geocache")]
#[command(about = "GeoCache - region-partitioned cache with cross-region replication")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli.config.as_deref(), cli.log_level.as_deref()).await
}
