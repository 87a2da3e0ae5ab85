//! In-Process Replication Transport
//!
//! Transport implementation using one tokio broadcast channel per region
//! for replication inside a single process.
//!
//! ## Features
//!
//! - Named channel per region, created by `declare`
//! - Payloads published after `declare` are buffered for the first consumer
//! - Configurable channel capacity
//! - Simulated partitions through [`InProcessTransport::set_connected`]
//!
//! ## Capacity
//!
//! When a channel is full the oldest payloads are dropped and the consumer
//! logs how many it skipped. Delivery is therefore at most once.
//!
//! ## Example
//!
//! ```ignore
//! use geocache_providers::InProcessTransport;
//!
//! let transport = InProcessTransport::new();
//! transport.declare(&region).await?;
//! let mut inbound = transport.consume(&region).await?;
//! transport.publish(&region, b"{\"key\":\"k\",\"value\":\"v\"}").await?;
//! ```

use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream;
use geocache_domain::error::{Error, Result};
use geocache_domain::ports::{PayloadStream, ReplicationTransport};
use geocache_domain::value_objects::RegionName;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::constants::DEFAULT_CHANNEL_CAPACITY;

struct RegionChannel {
    sender: broadcast::Sender<Vec<u8>>,
    /// Receiver created at declare time, handed to the first consumer
    parked: Mutex<Option<broadcast::Receiver<Vec<u8>>>>,
}

impl RegionChannel {
    fn new(capacity: usize) -> Self {
        let (sender, receiver) = broadcast::channel(capacity);
        Self {
            sender,
            parked: Mutex::new(Some(receiver)),
        }
    }

    fn receiver(&self) -> broadcast::Receiver<Vec<u8>> {
        self.parked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| self.sender.subscribe())
    }
}

/// Replication transport over tokio broadcast channels
#[derive(Clone)]
pub struct InProcessTransport {
    channels: Arc<DashMap<RegionName, RegionChannel>>,
    connected: Arc<AtomicBool>,
    capacity: usize,
}

impl InProcessTransport {
    /// Create a transport with the default capacity (1024)
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create with a custom per-region channel capacity
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            connected: Arc::new(AtomicBool::new(true)),
            capacity: capacity.max(1),
        }
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Simulate a partition (`false`) or its recovery (`true`)
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        debug!(connected, "In-process transport connectivity changed");
    }

    /// Per-region channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a channel exists for `region`
    pub fn is_declared(&self, region: &RegionName) -> bool {
        self.channels.contains_key(region)
    }

    /// Number of live receivers on the channel of `region`
    pub fn subscriber_count(&self, region: &RegionName) -> usize {
        self.channels
            .get(region)
            .map_or(0, |channel| channel.sender.receiver_count())
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::connectivity("In-process transport is disconnected"))
        }
    }
}

impl Default for InProcessTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InProcessTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessTransport")
            .field("capacity", &self.capacity)
            .field("channels", &self.channels.len())
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish()
    }
}

#[async_trait]
impl ReplicationTransport for InProcessTransport {
    async fn declare(&self, region: &RegionName) -> Result<()> {
        self.ensure_connected()?;
        let capacity = self.capacity;
        self.channels
            .entry(region.clone())
            .or_insert_with(|| RegionChannel::new(capacity));
        Ok(())
    }

    async fn publish(&self, region: &RegionName, payload: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        let channel = self.channels.get(region).ok_or_else(|| {
            Error::publish(region.as_str(), "No channel declared for region")
        })?;

        match channel.sender.send(payload.to_vec()) {
            Ok(count) => {
                debug!(region = %region, receivers = count, "Published payload");
            }
            Err(_) => {
                debug!(region = %region, "Published payload but no consumers");
            }
        }
        Ok(())
    }

    async fn consume(&self, region: &RegionName) -> Result<PayloadStream> {
        self.ensure_connected()?;
        let capacity = self.capacity;
        let receiver = self
            .channels
            .entry(region.clone())
            .or_insert_with(|| RegionChannel::new(capacity))
            .receiver();

        let region = region.clone();
        // Skip over lagged payloads instead of ending the stream
        let stream = stream::unfold((receiver, region), |(mut rx, region)| async move {
            loop {
                match rx.recv().await {
                    Ok(payload) => return Some((payload, (rx, region))),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(region = %region, skipped = n, "Region channel lagged; payloads dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return None;
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn provider_name(&self) -> &str {
        "tokio"
    }
}
