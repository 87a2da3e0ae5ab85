//! Failure breaker
//!
//! Counts transport failures and blocks further transport use once a
//! threshold is reached, until a time window elapses.
//!
//! Re-closing is purely time based: after `reset_after` has passed since the
//! last failure, [`FailureBreaker::is_open`] reports closed again *without*
//! clearing the failure count. One more failure then re-opens the breaker
//! immediately. Only [`FailureBreaker::reset`] clears the count, and nothing
//! calls it implicitly.

use geocache_domain::constants::{DEFAULT_BREAKER_MAX_FAILURES, DEFAULT_BREAKER_RESET_SECS};
use geocache_domain::error::{Error, Result};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Observable breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Fewer failures than the threshold
    Closed,
    /// Threshold reached and the reset window has not elapsed
    Open,
    /// Threshold reached but the window elapsed; transport use is allowed again
    HalfOpen,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Breaker configuration
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Failures needed to open the breaker
    pub max_failures: u32,
    /// How long the breaker stays open after the last failure
    pub reset_after: Duration,
    /// Breaker name used in logs
    pub name: String,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: DEFAULT_BREAKER_MAX_FAILURES,
            reset_after: Duration::from_secs(DEFAULT_BREAKER_RESET_SECS),
            name: "replication".to_string(),
        }
    }
}

impl BreakerConfig {
    /// Create a new configuration with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the failure threshold
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// Set the reset window
    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    failure_count: u32,
    last_failure_at: Option<Instant>,
}

/// Shared failure breaker for all transport use of one cache instance
#[derive(Debug)]
pub struct FailureBreaker {
    config: BreakerConfig,
    counters: Mutex<Counters>,
}

impl Default for FailureBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

impl FailureBreaker {
    /// Create a closed breaker
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            counters: Mutex::new(Counters::default()),
        }
    }

    /// The configuration this breaker was built with
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    fn counters(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_of(&self, counters: &Counters) -> BreakerState {
        if counters.failure_count < self.config.max_failures {
            return BreakerState::Closed;
        }
        match counters.last_failure_at {
            Some(at) if at.elapsed() < self.config.reset_after => BreakerState::Open,
            _ => BreakerState::HalfOpen,
        }
    }

    /// Record one transport failure
    ///
    /// Returns whether the breaker is open afterwards.
    pub fn record_failure(&self) -> bool {
        let mut counters = self.counters();
        let before = self.state_of(&counters);
        counters.failure_count = counters.failure_count.saturating_add(1);
        counters.last_failure_at = Some(Instant::now());
        let after = self.state_of(&counters);

        if before != BreakerState::Open && after == BreakerState::Open {
            tracing::warn!(
                breaker = %self.config.name,
                failures = counters.failure_count,
                from = %before,
                "Failure breaker opened"
            );
        } else {
            tracing::debug!(
                breaker = %self.config.name,
                failures = counters.failure_count,
                "Transport failure recorded"
            );
        }
        after == BreakerState::Open
    }

    /// Whether transport operations are currently blocked
    pub fn is_open(&self) -> bool {
        self.state() == BreakerState::Open
    }

    /// Current state, with half-open derived from the elapsed window
    pub fn state(&self) -> BreakerState {
        let counters = self.counters();
        self.state_of(&counters)
    }

    /// Fail fast with [`Error::BreakerOpen`] while the breaker is open
    pub fn check(&self) -> Result<()> {
        if self.is_open() {
            Err(Error::BreakerOpen)
        } else {
            Ok(())
        }
    }

    /// Clear the failure count after a verified success
    pub fn reset(&self) {
        let mut counters = self.counters();
        if counters.failure_count > 0 {
            tracing::info!(
                breaker = %self.config.name,
                from = %self.state_of(&counters),
                "Failure breaker reset"
            );
        }
        *counters = Counters::default();
    }

    /// Trip the breaker immediately
    pub fn open(&self) {
        let mut counters = self.counters();
        counters.failure_count = self.config.max_failures;
        counters.last_failure_at = Some(Instant::now());
        tracing::warn!(breaker = %self.config.name, "Failure breaker forced open");
    }

    /// Failures counted since construction or the last reset
    pub fn failure_count(&self) -> u32 {
        self.counters().failure_count
    }

    /// Time of the most recent failure
    pub fn last_failure_at(&self) -> Option<Instant> {
        self.counters().last_failure_at
    }
}
