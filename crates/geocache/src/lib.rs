//! # GeoCache
//!
//! A key-value cache partitioned by geographic region. Each region owns a
//! bounded LRU cache with per-entry time-to-live; writes made in one region
//! are replicated asynchronously to every other region over a message
//! transport. A shared failure breaker stops using the transport after
//! repeated failures and reads then fall back to possibly stale local data.
//!
//! ## Example
//!
//! ```ignore
//! use geocache::{GeoCache, GeoCacheOptions, InProcessTransport, RegionName};
//!
//! let regions = ["us-east", "eu-central"]
//!     .into_iter()
//!     .map(RegionName::new)
//!     .collect::<Result<Vec<_>, _>>()?;
//! let cache = GeoCache::start(regions, InProcessTransport::new_shared(), GeoCacheOptions::default()).await?;
//!
//! cache.put("user:1", "alice", "us-east").await?;
//! assert_eq!(cache.get("user:1", "us-east")?, Some("alice".to_string()));
//! ```
//!
//! ## Architecture
//!
//! - `domain` - region cache entity, change records, errors, transport port
//! - `application` - failure breaker, replication bus, `GeoCache` facade
//! - `providers` - in-process, NATS and null transports
//! - `infrastructure` - configuration, logging, composition root

pub mod node;

/// Domain layer - core types
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use geocache_domain::*;
}

/// Application layer - breaker, replication bus and cache facade
pub mod application {
    pub use geocache_application::*;
}

/// Transport providers
pub mod providers {
    pub use geocache_providers::*;
}

/// Infrastructure layer - config, logging and bootstrap
pub mod infrastructure {
    pub use geocache_infrastructure::*;
}

pub use domain::*;

pub use application::{BreakerConfig, BreakerState, FailureBreaker, GeoCache, GeoCacheOptions, ReplicationBus};
pub use infrastructure::{AppConfig, AppContext, ConfigLoader, init_app};
pub use providers::{InProcessTransport, NullTransport};

pub use node::run;
