//! Replication Transport Implementations
//!
//! ## Provider Selection Guide
//!
//! - **Single process**: `InProcessTransport` (default)
//! - **Several processes or nodes**: `NatsTransport`
//! - **Single region or tests**: `NullTransport`

pub mod in_process;
#[cfg(feature = "transport-nats")]
pub mod nats;
pub mod null;

pub use in_process::InProcessTransport;
#[cfg(feature = "transport-nats")]
pub use nats::NatsTransport;
pub use null::NullTransport;

/// Subject carrying the records addressed to `region`
pub fn region_subject(prefix: &str, region: &str) -> String {
    if prefix.is_empty() {
        region.to_string()
    } else {
        format!("{prefix}.{region}")
    }
}
