//! Value objects
//!
//! Immutable types identified by their value.

pub mod change_record;
pub mod region;

pub use change_record::{ChangePayload, ChangeRecord};
pub use region::RegionName;
