//! Null Replication Transport
//!
//! Discards every payload. Consumers get a stream that never yields.
//!
//! ## Usage
//!
//! ```ignore
//! use geocache_providers::NullTransport;
//!
//! let transport = NullTransport::new();
//! // All payloads are silently discarded
//! ```

use async_trait::async_trait;
use futures::stream;
use geocache_domain::error::Result;
use geocache_domain::ports::{PayloadStream, ReplicationTransport};
use geocache_domain::value_objects::RegionName;
use std::sync::Arc;

/// Null transport for single-region deployments and testing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl NullTransport {
    /// Create a new null transport
    pub fn new() -> Self {
        Self
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl ReplicationTransport for NullTransport {
    async fn declare(&self, _region: &RegionName) -> Result<()> {
        Ok(())
    }

    async fn publish(&self, _region: &RegionName, _payload: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn consume(&self, _region: &RegionName) -> Result<PayloadStream> {
        Ok(Box::pin(stream::pending()))
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}
