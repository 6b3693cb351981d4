//! Position acquisition.
//!
//! [`PositionSource`] applies permission, cache age and timeout rules on top
//! of a platform [`LocationProvider`].

mod permission;
mod simulated;
mod source;

pub use permission::PermissionGate;
pub use simulated::SimulatedProvider;
pub use source::{LocationProvider, PositionSource};
