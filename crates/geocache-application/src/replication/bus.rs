//! Replication bus
//!
//! Fan-out: a change record published by one region is sent to the named
//! channel of every *other* configured region; never back to its origin.
//! Fan-in: one supervised delivery worker per region feeds inbound payloads
//! to the handler registered for that region.
//!
//! Publishing is best effort. A failed send is logged, counted by the
//! [`FailureBreaker`] and reported in the [`PublishReport`]; it is never
//! retried and never raised to the writer. While the breaker is open no
//! sends are attempted at all. A fan-out in which every send succeeded
//! resets the breaker.
//!
//! Ordering: sends for one record go out sequentially, and a single writer's
//! records go out in call order, so one origin/key stream arrives in publish
//! order on each channel. Nothing orders different keys or different origins.

use geocache_domain::error::{Error, Result};
use geocache_domain::ports::ReplicationTransport;
use geocache_domain::value_objects::{ChangeRecord, RegionName};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use super::pool::{DeliveryHandler, DeliveryPool, WorkerSpec};
use crate::resilience::FailureBreaker;

/// Outcome of one fan-out
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Regions whose channel accepted the record
    pub delivered: Vec<RegionName>,
    /// Regions whose send failed or was suppressed, with the reason
    pub failed: Vec<(RegionName, Error)>,
    /// The whole fan-out was skipped because the breaker was open
    pub suppressed: bool,
}

impl PublishReport {
    /// Every target accepted the record
    pub fn is_complete(&self) -> bool {
        !self.suppressed && self.failed.is_empty()
    }

    /// Number of regions the record was meant for
    pub fn targets(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Fan-out/fan-in layer between region caches and the transport
pub struct ReplicationBus {
    transport: Arc<dyn ReplicationTransport>,
    regions: Vec<RegionName>,
    breaker: Arc<FailureBreaker>,
    pool: DeliveryPool,
    restart_backoff: Duration,
}

impl ReplicationBus {
    /// Create a bus over a fixed region set
    pub fn new(
        transport: Arc<dyn ReplicationTransport>,
        regions: Vec<RegionName>,
        breaker: Arc<FailureBreaker>,
        restart_backoff: Duration,
    ) -> Self {
        Self {
            transport,
            regions,
            breaker,
            pool: DeliveryPool::new(),
            restart_backoff,
        }
    }

    /// The configured regions
    pub fn regions(&self) -> &[RegionName] {
        &self.regions
    }

    /// The underlying transport
    pub fn transport(&self) -> &Arc<dyn ReplicationTransport> {
        &self.transport
    }

    /// The shared failure breaker
    pub fn breaker(&self) -> &Arc<FailureBreaker> {
        &self.breaker
    }

    /// The delivery worker pool
    pub fn pool(&self) -> &DeliveryPool {
        &self.pool
    }

    /// Regions a record from `origin` fans out to
    pub fn targets<'a>(&'a self, origin: &'a RegionName) -> impl Iterator<Item = &'a RegionName> {
        self.regions.iter().filter(move |region| *region != origin)
    }

    /// Declare the channel of every region
    ///
    /// Stops at the first failure, which is also counted by the breaker.
    pub async fn declare_all(&self) -> Result<()> {
        self.breaker.check()?;
        for region in &self.regions {
            if let Err(e) = self.transport.declare(region).await {
                self.breaker.record_failure();
                return Err(e);
            }
            debug!(region = %region, provider = self.transport.provider_name(), "Declared region channel");
        }
        Ok(())
    }

    /// Send `record` to every region except its origin
    pub async fn publish(&self, record: &ChangeRecord) -> PublishReport {
        let origin = record.origin_region();
        let mut report = PublishReport::default();

        if self.breaker.is_open() {
            debug!(origin = %origin, key = record.key(), "Breaker open; replication suppressed");
            report.suppressed = true;
            report.failed = self
                .targets(origin)
                .map(|region| (region.clone(), Error::BreakerOpen))
                .collect();
            return report;
        }

        let payload = match record.encode() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(origin = %origin, key = record.key(), error = %e, "Failed to encode change record");
                report.failed = self
                    .targets(origin)
                    .map(|region| (region.clone(), Error::publish(region.as_str(), e.to_string())))
                    .collect();
                return report;
            }
        };

        for region in self.targets(origin) {
            if self.breaker.is_open() {
                report.failed.push((region.clone(), Error::BreakerOpen));
                continue;
            }
            match self.transport.publish(region, &payload).await {
                Ok(()) => {
                    trace!(origin = %origin, target = %region, key = record.key(), "Change record published");
                    report.delivered.push(region.clone());
                }
                Err(e) => {
                    self.breaker.record_failure();
                    warn!(
                        origin = %origin,
                        target = %region,
                        key = record.key(),
                        error = %e,
                        retryable = e.is_retryable(),
                        "Replication publish failed"
                    );
                    report.failed.push((region.clone(), e));
                }
            }
        }

        if report.is_complete() && !report.delivered.is_empty() {
            self.breaker.reset();
        }
        report
    }

    /// Register `handler` for records delivered to `region`
    ///
    /// The handler runs on the region's own delivery worker, never on the
    /// publisher's call stack, one payload at a time.
    pub fn subscribe(&self, region: &RegionName, handler: DeliveryHandler) -> Result<()> {
        if !self.regions.contains(region) {
            return Err(Error::unknown_region(region.as_str()));
        }
        self.pool.spawn_worker(WorkerSpec {
            region: region.clone(),
            transport: Arc::clone(&self.transport),
            breaker: Arc::clone(&self.breaker),
            handler,
            restart_backoff: self.restart_backoff,
        });
        Ok(())
    }

    /// Fail with a connectivity error when the transport is unusable
    ///
    /// An open breaker short-circuits. A transport that reports itself
    /// disconnected counts as a failure.
    pub fn check_connectivity(&self) -> Result<()> {
        self.breaker.check()?;
        if !self.transport.is_connected() {
            self.breaker.record_failure();
            return Err(Error::connectivity(format!(
                "{} transport is disconnected",
                self.transport.provider_name()
            )));
        }
        Ok(())
    }

    /// Stop every delivery worker
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!(provider = self.transport.provider_name(), "Stopping replication bus");
        self.pool.shutdown(timeout).await
    }
}

impl std::fmt::Debug for ReplicationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicationBus")
            .field("transport", &self.transport.provider_name())
            .field("regions", &self.regions)
            .field("breaker", &self.breaker.state())
            .finish()
    }
}
