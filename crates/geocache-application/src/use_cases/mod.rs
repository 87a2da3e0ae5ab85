//! Use cases
//!
//! The region-partitioned cache facade and the per-region store it owns.

pub mod geo_cache;
pub mod region_store;

pub use geo_cache::{GeoCache, GeoCacheOptions};
pub use region_store::RegionStore;
