//! Configuration management
//!
//! Layered configuration with Figment: built-in defaults, then a TOML file,
//! then `GEOCACHE__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, CacheConfig, LoggingConfig, ResilienceConfig, TransportConfig, TransportProvider,
};
