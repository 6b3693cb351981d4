use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::warn;

/// Fine location access, decided once at startup and shared by every driver.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    granted: Arc<AtomicBool>,
}

impl PermissionGate {
    /// Record the answer of the platform permission prompt.
    pub fn from_prompt(granted: bool) -> Self {
        if !granted {
            warn!("Location permission denied; every acquisition will fail");
        }
        Self {
            granted: Arc::new(AtomicBool::new(granted)),
        }
    }

    pub fn granted() -> Self {
        Self::from_prompt(true)
    }

    pub fn denied() -> Self {
        Self::from_prompt(false)
    }

    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
}
