//! Transport factory
//!
//! Maps the transport section of the configuration to a concrete
//! `ReplicationTransport`.

use crate::config::{TransportConfig, TransportProvider};
use geocache_domain::error::Result;
use geocache_domain::ports::ReplicationTransport;
use geocache_providers::{InProcessTransport, NullTransport};
use std::sync::Arc;
use tracing::info;

/// Build the configured replication transport
pub async fn create_transport(config: &TransportConfig) -> Result<Arc<dyn ReplicationTransport>> {
    let transport: Arc<dyn ReplicationTransport> = match config.provider {
        TransportProvider::Tokio => Arc::new(InProcessTransport::with_capacity(config.capacity)),
        TransportProvider::Null => Arc::new(NullTransport::new()),
        TransportProvider::Nats => create_nats_transport(config).await?,
    };
    info!(provider = transport.provider_name(), "Replication transport created");
    Ok(transport)
}

#[cfg(feature = "transport-nats")]
async fn create_nats_transport(config: &TransportConfig) -> Result<Arc<dyn ReplicationTransport>> {
    use geocache_domain::error::Error;
    use geocache_providers::NatsTransport;

    let url = config
        .nats_url
        .as_deref()
        .ok_or_else(|| Error::configuration("NATS URL is required for the NATS transport"))?;
    let transport = NatsTransport::with_options(
        url,
        &config.subject_prefix,
        Some(config.nats_client_name.as_str()),
        config.connection_timeout(),
    )
    .await?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "transport-nats"))]
async fn create_nats_transport(_config: &TransportConfig) -> Result<Arc<dyn ReplicationTransport>> {
    Err(geocache_domain::error::Error::configuration(
        "NATS transport requested but the `transport-nats` feature is disabled",
    ))
}
