//! Ports
//!
//! Contracts the core depends on but does not implement.

pub mod transport;

pub use transport::{PayloadStream, ReplicationTransport};
