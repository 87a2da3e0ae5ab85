//! Configuration types module

pub mod app;
pub mod cache;
pub mod logging;
pub mod resilience;
pub mod transport;

pub use app::AppConfig;
pub use cache::CacheConfig;
pub use logging::LoggingConfig;
pub use resilience::ResilienceConfig;
pub use transport::{TransportConfig, TransportProvider};
