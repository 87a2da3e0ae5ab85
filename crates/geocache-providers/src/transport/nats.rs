//! NATS Replication Transport
//!
//! Transport implementation using NATS for replication between processes.
//!
//! ## Features
//!
//! - One subject per region: `{subject_prefix}.{region}`
//! - Connect timeout and client name for server-side identification
//! - Reconnection support built into async-nats
//!
//! Subjects need no declaration on the server, so `declare` only verifies
//! that the client is connected. Every subscriber of a region subject
//! receives every payload; NATS core delivery is at most once.
//!
//! ## Example
//!
//! ```ignore
//! use geocache_providers::NatsTransport;
//!
//! let transport = NatsTransport::connect("nats://localhost:4222").await?;
//! let mut inbound = transport.consume(&region).await?;
//! ```

use async_nats::Client;
use async_nats::connection::State;
use async_trait::async_trait;
use futures::StreamExt;
use geocache_domain::error::{Error, Result};
use geocache_domain::ports::{PayloadStream, ReplicationTransport};
use geocache_domain::value_objects::RegionName;
use std::time::Duration;
use tracing::{debug, info};

use super::region_subject;
use crate::constants::{
    DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_NATS_CLIENT_NAME, DEFAULT_SUBJECT_PREFIX,
};

/// Replication transport over NATS core subjects
pub struct NatsTransport {
    /// NATS client
    client: Client,
    /// Prefix of every region subject
    subject_prefix: String,
}

impl NatsTransport {
    /// Connect with default options
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if the server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::with_options(
            url,
            DEFAULT_SUBJECT_PREFIX,
            Some(DEFAULT_NATS_CLIENT_NAME),
            Duration::from_millis(DEFAULT_CONNECTION_TIMEOUT_MS),
        )
        .await
    }

    /// Connect with a subject prefix, client name and connect timeout
    ///
    /// # Arguments
    ///
    /// * `url` - NATS server URL
    /// * `subject_prefix` - Prefix of the per-region subjects
    /// * `client_name` - Optional client name for server-side identification
    /// * `timeout` - Connect timeout
    pub async fn with_options(
        url: &str,
        subject_prefix: &str,
        client_name: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        info!(url = %url, "Connecting to NATS server");

        let mut options = async_nats::ConnectOptions::new().connection_timeout(timeout);
        if let Some(name) = client_name {
            options = options.name(name);
        }

        let client = options.connect(url).await.map_err(|e| {
            Error::connectivity_with_source(format!("Failed to connect to NATS server at {url}"), e)
        })?;

        info!(url = %url, "Connected to NATS server");

        Ok(Self {
            client,
            subject_prefix: subject_prefix.to_string(),
        })
    }

    /// Subject carrying the records of `region`
    pub fn subject(&self, region: &RegionName) -> String {
        region_subject(&self.subject_prefix, region.as_str())
    }

    fn ensure_connected(&self) -> Result<()> {
        match self.client.connection_state() {
            State::Connected => Ok(()),
            state => Err(Error::connectivity(format!("NATS client is {state:?}"))),
        }
    }
}

impl std::fmt::Debug for NatsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsTransport")
            .field("subject_prefix", &self.subject_prefix)
            .field("state", &self.client.connection_state())
            .finish()
    }
}

#[async_trait]
impl ReplicationTransport for NatsTransport {
    async fn declare(&self, region: &RegionName) -> Result<()> {
        self.ensure_connected()?;
        debug!(subject = %self.subject(region), "NATS subject ready");
        Ok(())
    }

    async fn publish(&self, region: &RegionName, payload: &[u8]) -> Result<()> {
        let subject = self.subject(region);
        self.client
            .publish(subject.clone(), payload.to_vec().into())
            .await
            .map_err(|e| {
                Error::publish_with_source(
                    region.as_str(),
                    format!("Failed to publish to NATS subject '{subject}'"),
                    e,
                )
            })?;

        debug!(subject = %subject, "Published payload to NATS");
        Ok(())
    }

    async fn consume(&self, region: &RegionName) -> Result<PayloadStream> {
        let subject = self.subject(region);
        let subscriber = self.client.subscribe(subject.clone()).await.map_err(|e| {
            Error::consume(
                region.as_str(),
                format!("Failed to subscribe to NATS subject '{subject}': {e}"),
            )
        })?;

        debug!(subject = %subject, "Subscribed to NATS subject");
        Ok(Box::pin(subscriber.map(|message| message.payload.to_vec())))
    }

    fn is_connected(&self) -> bool {
        self.ensure_connected().is_ok()
    }

    fn provider_name(&self) -> &str {
        "nats"
    }
}
