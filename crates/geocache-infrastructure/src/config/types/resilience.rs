//! Resilience configuration types

use geocache_application::resilience::BreakerConfig;
use geocache_domain::constants::{DEFAULT_BREAKER_MAX_FAILURES, DEFAULT_BREAKER_RESET_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resilience configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Transport failures before the breaker opens
    pub breaker_max_failures: u32,

    /// Seconds after the last failure before the breaker closes again
    pub breaker_reset_secs: u64,
}

/// Returns default resilience configuration with:
/// - 3 failures to open the breaker
/// - a 60 second reset window
impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            breaker_max_failures: DEFAULT_BREAKER_MAX_FAILURES,
            breaker_reset_secs: DEFAULT_BREAKER_RESET_SECS,
        }
    }
}

impl ResilienceConfig {
    /// Breaker settings for the replication breaker
    pub fn breaker(&self) -> BreakerConfig {
        BreakerConfig::default()
            .with_max_failures(self.breaker_max_failures)
            .with_reset_after(Duration::from_secs(self.breaker_reset_secs))
    }
}
