//! Error handling types
//!
//! Expected cache misses are never errors: lookups return `Option`. The
//! variants below are faults (transport, decoding, configuration) or caller
//! mistakes such as naming a region that was never configured.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error source carried by contextual variants
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for GeoCache
#[derive(Error, Debug)]
pub enum Error {
    /// The message transport is unreachable
    #[error("Connectivity failure: {message}")]
    Connectivity {
        /// Description of the connectivity failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// A single fan-out send failed
    #[error("Publish to region '{region}' failed: {message}")]
    Publish {
        /// Target region of the failed send
        region: String,
        /// Description of the publish failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Subscribing to or reading from a region channel failed
    #[error("Consume from region '{region}' failed: {message}")]
    Consume {
        /// Region whose channel could not be consumed
        region: String,
        /// Description of the consume failure
        message: String,
    },

    /// An inbound payload could not be decoded into a change record
    #[error("Malformed change record: {message}")]
    MalformedRecord {
        /// Description of the decoding problem
        message: String,
    },

    /// A transport operation was rejected because the breaker is open
    #[error("Failure breaker is open; transport operations are suspended")]
    BreakerOpen,

    /// The region was not part of the configured region set
    #[error("Unknown region: {region}")]
    UnknownRegion {
        /// The region that was not found
        region: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },
}

// Transport error creation methods
impl Error {
    /// Create a connectivity error
    pub fn connectivity<S: Into<String>>(message: S) -> Self {
        Self::Connectivity {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connectivity error with source
    pub fn connectivity_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connectivity {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a publish error for one target region
    pub fn publish<R: Into<String>, S: Into<String>>(region: R, message: S) -> Self {
        Self::Publish {
            region: region.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a publish error with source
    pub fn publish_with_source<R, S, E>(region: R, message: S, source: E) -> Self
    where
        R: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Publish {
            region: region.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a consume error
    pub fn consume<R: Into<String>, S: Into<String>>(region: R, message: S) -> Self {
        Self::Consume {
            region: region.into(),
            message: message.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed_record<S: Into<String>>(message: S) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }
}

// Caller and configuration error creation methods
impl Error {
    /// Create an unknown region error
    pub fn unknown_region<S: Into<String>>(region: S) -> Self {
        Self::UnknownRegion {
            region: region.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification
impl Error {
    /// True when the fault means the transport itself is unavailable.
    ///
    /// Read paths fall back to stale data on these.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::BreakerOpen)
    }

    /// True when retrying the same operation later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connectivity { .. }
                | Self::Publish { .. }
                | Self::Consume { .. }
                | Self::BreakerOpen
        )
    }
}
