//! # GeoCache - Transport Providers
//!
//! Implementations of the `ReplicationTransport` port defined in
//! `geocache-domain`.
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | `InProcessTransport` | In-Process | One tokio broadcast channel per region |
//! | `NatsTransport` | Distributed | One NATS subject per region (feature `transport-nats`) |
//! | `NullTransport` | Testing | Discards every payload |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! geocache-providers = { version = "0.1", features = ["transport-nats"] }
//! ```

pub mod constants;
pub mod transport;

pub use geocache_domain::error::{Error, Result};
pub use geocache_domain::ports::{PayloadStream, ReplicationTransport};

#[cfg(feature = "transport-nats")]
pub use transport::NatsTransport;
pub use transport::{InProcessTransport, NullTransport};
