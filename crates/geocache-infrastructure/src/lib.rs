//! # GeoCache Infrastructure Layer
//!
//! Cross-cutting technical concerns around the cache:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration: defaults, TOML file, `GEOCACHE__` env vars |
//! | [`logging`] | tracing subscriber setup with optional JSON and rolling file output |
//! | [`error_ext`] | Context helpers converting foreign errors into domain errors |
//! | [`di`] | Transport factory and the composition root building a `GeoCache` |
//! | [`constants`] | Infrastructure defaults |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

pub use config::{AppConfig, ConfigLoader};
pub use di::{AppContext, init_app};
pub use error_ext::ErrorContext;
