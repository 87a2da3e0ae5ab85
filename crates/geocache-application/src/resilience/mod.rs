//! Failure isolation for transport operations

pub mod breaker;

pub use breaker::{BreakerConfig, BreakerState, FailureBreaker};
