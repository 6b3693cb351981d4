//! Lifecycle tracking: which driver owns delivery right now.

mod bus;
mod coordinator;

pub use bus::{LifecycleBus, LifecycleSubscription};
pub use coordinator::LifecycleCoordinator;
