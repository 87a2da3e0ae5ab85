//! # GeoCache Domain Layer
//!
//! Core types of the geo-distributed cache. This crate has no knowledge of
//! any concrete message transport, configuration source or runtime wiring.
//!
//! ## Contents
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`entities`] | `RegionCache`, the bounded TTL-aware LRU owned by one region |
//! | [`value_objects`] | `RegionName`, `ChangeRecord` and its wire form `ChangePayload` |
//! | [`ports`] | `ReplicationTransport`, the abstract publish/consume capability |
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`constants`] | Domain defaults |

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use entities::{CacheEntry, RegionCache, RegionCacheStats};
pub use error::{Error, Result};
pub use ports::{PayloadStream, ReplicationTransport};
pub use value_objects::{ChangePayload, ChangeRecord, RegionName};
