//! Composition root
//!
//! Builds the configured transport and wires it into a running `GeoCache`.
//!
//! ```text
//! AppConfig → create_transport → Arc<dyn ReplicationTransport>
//!          └→ geo_cache_options → GeoCache::start → AppContext
//! ```

pub mod bootstrap;
pub mod transport_factory;

pub use bootstrap::{AppContext, geo_cache_options, init_app};
pub use transport_factory::create_transport;
