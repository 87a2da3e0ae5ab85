//! Application Layer - GeoCache
//!
//! Orchestrates the domain types into a geo-distributed cache:
//!
//! - [`resilience`]: the [`FailureBreaker`] guarding transport use
//! - [`replication`]: the [`ReplicationBus`] fan-out/fan-in layer and its
//!   supervised per-region delivery workers
//! - [`use_cases`]: the [`GeoCache`] facade over per-region caches
//!
//! ## Control flow
//!
//! ```text
//! put(key, value, region) ──► RegionStore[region] (local write)
//!                          └─► ReplicationBus::publish ──► transport channel of every other region
//!
//! transport channel[r] ──► delivery worker[r] ──► GeoCache::on_replicated_change ──► RegionStore[r]
//! ```
//!
//! ## Dependencies
//!
//! This crate depends only on `geocache-domain` and runtime libraries; the
//! concrete transport is injected as `Arc<dyn ReplicationTransport>`.

pub mod replication;
pub mod resilience;
pub mod use_cases;

pub use replication::{DeliveryHandler, DeliveryPool, PublishReport, ReplicationBus};
pub use resilience::{BreakerConfig, BreakerState, FailureBreaker};
pub use use_cases::{GeoCache, GeoCacheOptions, RegionStore};
