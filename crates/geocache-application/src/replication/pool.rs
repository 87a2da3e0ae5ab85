//! Delivery worker pool
//!
//! One long-lived delivery worker per region consumes that region's channel
//! and applies payloads strictly in arrival order. Each worker runs under a
//! supervisor that restarts it when it panics, fails to subscribe, or its
//! stream ends, so a crashed worker never silently vanishes.
//!
//! Shutdown uses tokio-util primitives:
//! - `CancellationToken` to signal every supervisor and worker
//! - `TaskTracker` to await the supervisors
//!
//! ```rust,ignore
//! let pool = DeliveryPool::new();
//! pool.spawn_worker(spec);
//! let clean = pool.shutdown(Duration::from_secs(5)).await;
//! ```

use futures::StreamExt;
use geocache_domain::error::{Error, Result};
use geocache_domain::ports::ReplicationTransport;
use geocache_domain::value_objects::RegionName;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::resilience::FailureBreaker;

/// Callback applying one inbound payload to a region
///
/// Errors are logged by the worker and the payload is dropped; the worker
/// keeps consuming.
pub type DeliveryHandler = Arc<dyn Fn(&[u8]) -> Result<()> + Send + Sync>;

/// Everything a delivery worker needs
#[derive(Clone)]
pub struct WorkerSpec {
    /// Region whose channel the worker consumes
    pub region: RegionName,
    /// Transport to consume from
    pub transport: Arc<dyn ReplicationTransport>,
    /// Breaker consulted before (re)subscribing
    pub breaker: Arc<FailureBreaker>,
    /// Payload handler
    pub handler: DeliveryHandler,
    /// Pause between restarts and breaker polls
    pub restart_backoff: Duration,
}

/// Why a worker returned
#[derive(Debug)]
enum WorkerExit {
    Cancelled,
    StreamClosed,
    SubscribeFailed(Error),
}

/// Supervised pool of per-region delivery workers
#[derive(Clone)]
pub struct DeliveryPool {
    cancel_token: CancellationToken,
    task_tracker: TaskTracker,
    restarts: Arc<Mutex<HashMap<RegionName, Arc<AtomicU64>>>>,
}

impl Default for DeliveryPool {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
            restarts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a supervised worker for `spec.region`
    pub fn spawn_worker(&self, spec: WorkerSpec) {
        let restarts = Arc::new(AtomicU64::new(0));
        self.restarts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(spec.region.clone(), Arc::clone(&restarts));

        let token = self.cancel_token.child_token();
        info!(region = %spec.region, "Starting delivery worker");
        self.task_tracker.spawn(supervise(spec, token, restarts));
    }

    /// How many times the worker of `region` has been restarted
    pub fn worker_restarts(&self, region: &RegionName) -> u64 {
        self.restarts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(region)
            .map_or(0, |count| count.load(Ordering::Relaxed))
    }

    /// Number of live supervisors
    pub fn active_workers(&self) -> usize {
        self.task_tracker.len()
    }

    /// Check if shutdown has been initiated
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Cancel every worker and wait for the supervisors to finish
    ///
    /// Returns `true` if all of them finished before the timeout.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!(
            workers = self.task_tracker.len(),
            "Shutting down delivery workers"
        );
        self.cancel_token.cancel();
        self.task_tracker.close();

        tokio::select! {
            () = self.task_tracker.wait() => {
                info!("All delivery workers stopped");
                true
            }
            () = tokio::time::sleep(timeout) => {
                warn!(
                    remaining = self.task_tracker.len(),
                    "Delivery worker shutdown timed out"
                );
                false
            }
        }
    }
}

async fn supervise(spec: WorkerSpec, token: CancellationToken, restarts: Arc<AtomicU64>) {
    loop {
        let worker = tokio::spawn(run_worker(spec.clone(), token.clone()));

        match worker.await {
            Ok(WorkerExit::Cancelled) => break,
            Ok(WorkerExit::StreamClosed) => {
                warn!(region = %spec.region, "Delivery stream closed; restarting worker");
            }
            Ok(WorkerExit::SubscribeFailed(e)) => {
                warn!(region = %spec.region, error = %e, "Subscribe failed; restarting worker");
            }
            Err(join_error) if join_error.is_panic() => {
                error!(region = %spec.region, "Delivery worker panicked; restarting");
            }
            Err(join_error) => {
                debug!(region = %spec.region, error = %join_error, "Delivery worker aborted");
                break;
            }
        }

        if token.is_cancelled() {
            break;
        }
        restarts.fetch_add(1, Ordering::Relaxed);

        tokio::select! {
            () = token.cancelled() => break,
            () = tokio::time::sleep(spec.restart_backoff) => {}
        }
    }
    debug!(region = %spec.region, "Delivery supervisor stopped");
}

async fn run_worker(spec: WorkerSpec, token: CancellationToken) -> WorkerExit {
    while spec.breaker.is_open() {
        tokio::select! {
            () = token.cancelled() => return WorkerExit::Cancelled,
            () = tokio::time::sleep(spec.restart_backoff) => {}
        }
    }

    let mut inbound = tokio::select! {
        () = token.cancelled() => return WorkerExit::Cancelled,
        consumed = spec.transport.consume(&spec.region) => match consumed {
            Ok(stream) => stream,
            Err(e) => {
                spec.breaker.record_failure();
                return WorkerExit::SubscribeFailed(e);
            }
        },
    };
    debug!(region = %spec.region, "Delivery worker subscribed");

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => return WorkerExit::Cancelled,
            next = inbound.next() => match next {
                Some(payload) => {
                    if let Err(e) = (spec.handler)(&payload) {
                        warn!(region = %spec.region, error = %e, "Dropping undeliverable change record");
                    }
                }
                None => return WorkerExit::StreamClosed,
            },
        }
    }
}
