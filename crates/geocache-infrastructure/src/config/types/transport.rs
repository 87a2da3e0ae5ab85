//! Replication transport configuration types

use crate::constants::DEFAULT_RESTART_BACKOFF_MS;
use geocache_providers::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_NATS_CLIENT_NAME,
    DEFAULT_SUBJECT_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Transport providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportProvider {
    /// In-process tokio broadcast channels
    #[default]
    Tokio,
    /// NATS server
    Nats,
    /// Discard everything
    Null,
}

impl fmt::Display for TransportProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokio => write!(f, "tokio"),
            Self::Nats => write!(f, "nats"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// Replication transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Transport provider
    pub provider: TransportProvider,

    /// Buffered payloads per in-process region channel
    pub capacity: usize,

    /// NATS server URL (for the NATS provider)
    pub nats_url: Option<String>,

    /// Client name announced to NATS
    pub nats_client_name: String,

    /// Prefix of the per-region NATS subjects
    pub subject_prefix: String,

    /// NATS connect timeout in milliseconds
    pub connection_timeout_ms: u64,

    /// Pause before restarting a crashed delivery worker, in milliseconds
    pub restart_backoff_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            provider: TransportProvider::default(),
            capacity: DEFAULT_CHANNEL_CAPACITY,
            nats_url: None,
            nats_client_name: DEFAULT_NATS_CLIENT_NAME.to_string(),
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            restart_backoff_ms: DEFAULT_RESTART_BACKOFF_MS,
        }
    }
}

impl TransportConfig {
    /// NATS connect timeout
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// Delivery worker restart backoff
    pub fn restart_backoff(&self) -> Duration {
        Duration::from_millis(self.restart_backoff_ms)
    }
}
