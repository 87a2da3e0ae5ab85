//! Domain layer constants
//!
//! Defaults shared by the cache entity and the configuration layer.

/// Default capacity of a region cache (entries)
pub const DEFAULT_REGION_CAPACITY: usize = 100;

/// Default time-to-live of a cache entry in seconds (5 minutes)
pub const DEFAULT_ENTRY_TTL_SECS: u64 = 300;

/// Default consecutive transport failures before the breaker opens
pub const DEFAULT_BREAKER_MAX_FAILURES: u32 = 3;

/// Default breaker re-close window in seconds
pub const DEFAULT_BREAKER_RESET_SECS: u64 = 60;

/// Regions configured when none are supplied
pub const DEFAULT_REGIONS: &[&str] = &["us-east", "eu-central", "asia-south"];
