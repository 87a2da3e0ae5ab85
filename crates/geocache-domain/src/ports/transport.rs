//! Replication Transport Port
//!
//! Defines the message-transport capability the replication bus needs:
//! one named delivery channel per region, best-effort publishing to a
//! channel, and an inbound payload stream per channel.
//!
//! ## Usage
//!
//! ```ignore
//! use geocache_domain::ports::ReplicationTransport;
//! use futures::StreamExt;
//!
//! async fn relay(transport: Arc<dyn ReplicationTransport>, region: &RegionName) -> Result<()> {
//!     transport.declare(region).await?;
//!     let mut inbound = transport.consume(region).await?;
//!     while let Some(payload) = inbound.next().await {
//!         // apply payload
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::value_objects::RegionName;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Boxed async stream of raw payloads delivered to one region channel
///
/// The stream ends when the transport closes the channel.
pub type PayloadStream = Pin<Box<dyn Stream<Item = Vec<u8>> + Send + 'static>>;

/// Message transport used to replicate writes between regions
///
/// | Method | Purpose |
/// |--------|---------|
/// | `declare` | Idempotently create the channel for a region |
/// | `publish` | Best-effort send of a payload to a region channel |
/// | `consume` | Open the inbound payload stream of a region channel |
/// | `is_connected` | Cheap connectivity probe used by read paths |
#[async_trait]
pub trait ReplicationTransport: Send + Sync + std::fmt::Debug {
    /// Create the delivery channel for `region`; calling it twice is harmless
    async fn declare(&self, region: &RegionName) -> Result<()>;

    /// Send a payload to the channel of `region`
    ///
    /// Fails with a connectivity error when the transport is unreachable.
    async fn publish(&self, region: &RegionName, payload: &[u8]) -> Result<()>;

    /// Open the stream of payloads addressed to `region`
    async fn consume(&self, region: &RegionName) -> Result<PayloadStream>;

    /// Whether the transport currently believes it can reach its broker
    fn is_connected(&self) -> bool;

    /// Get the name/identifier of this transport implementation
    fn provider_name(&self) -> &str;
}
