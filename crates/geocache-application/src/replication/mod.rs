//! Cross-region replication
//!
//! | Type | Role |
//! |------|------|
//! | [`ReplicationBus`] | Fans a change record out to every other region and routes inbound payloads |
//! | [`DeliveryPool`] | Supervised long-lived delivery workers, one per region |
//! | [`PublishReport`] | Per-target outcome of one fan-out |

pub mod bus;
pub mod pool;

pub use bus::{PublishReport, ReplicationBus};
pub use pool::{DeliveryHandler, DeliveryPool, WorkerSpec};
