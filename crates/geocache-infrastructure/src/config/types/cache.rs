//! Region cache configuration types

use geocache_domain::constants::{DEFAULT_ENTRY_TTL_SECS, DEFAULT_REGION_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Region cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum entries per region
    pub capacity: usize,

    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_REGION_CAPACITY,
            ttl_secs: DEFAULT_ENTRY_TTL_SECS,
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
