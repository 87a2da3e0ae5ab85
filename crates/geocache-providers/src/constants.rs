//! Provider defaults

/// Buffered payloads per in-process region channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Prefix of the per-region NATS subjects
pub const DEFAULT_SUBJECT_PREFIX: &str = "geocache.regions";

/// Client name announced to the NATS server
pub const DEFAULT_NATS_CLIENT_NAME: &str = "geocache";

/// NATS connect timeout in milliseconds
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 5000;
