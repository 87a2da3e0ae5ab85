//! Main application configuration

use geocache_domain::constants::DEFAULT_REGIONS;
use geocache_domain::error::Result;
use geocache_domain::value_objects::RegionName;
use serde::{Deserialize, Serialize};

use super::{CacheConfig, LoggingConfig, ResilienceConfig, TransportConfig};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Regions hosted by this node, in order
    pub regions: Vec<String>,
    /// Region cache configuration
    pub cache: CacheConfig,
    /// Failure breaker configuration
    pub resilience: ResilienceConfig,
    /// Replication transport configuration
    pub transport: TransportConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.iter().map(|r| (*r).to_string()).collect(),
            cache: CacheConfig::default(),
            resilience: ResilienceConfig::default(),
            transport: TransportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse the configured region names
    pub fn region_names(&self) -> Result<Vec<RegionName>> {
        self.regions.iter().map(RegionName::new).collect()
    }
}
