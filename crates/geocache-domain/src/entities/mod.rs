//! Domain entities

pub mod region_cache;

pub use region_cache::{CacheEntry, RegionCache, RegionCacheStats};
