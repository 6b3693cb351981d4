use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::debug;
use tokio::time::{self, Duration, Instant};

use crate::error::{ReportError, Result};
use crate::models::{AccuracyTier, AcquireOptions, PositionSample};

use super::PermissionGate;

/// The platform's location capability.
///
/// Implementations may return a less precise fix than `accuracy` asks for.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_fix(&self, accuracy: AccuracyTier) -> Result<PositionSample>;
}

struct CachedFix {
    sample: PositionSample,
    obtained_at: Instant,
}

pub struct PositionSource {
    provider: Arc<dyn LocationProvider>,
    permission: PermissionGate,
    last_fix: Mutex<Option<CachedFix>>,
}

impl PositionSource {
    pub fn new(provider: Arc<dyn LocationProvider>, permission: PermissionGate) -> Self {
        Self {
            provider,
            permission,
            last_fix: Mutex::new(None),
        }
    }

    /// Produce a fix, or fail without touching the provider when permission
    /// is missing.
    pub async fn acquire(&self, options: &AcquireOptions) -> Result<PositionSample> {
        if !self.permission.is_granted() {
            return Err(ReportError::PermissionDenied);
        }

        if let Some(sample) = self.cached_fix(options.max_cache_age) {
            debug!("Serving cached fix captured at {}", sample.captured_at);
            return Ok(sample);
        }

        let fix = self.provider.current_fix(options.accuracy);
        let sample = match time::timeout(options.timeout, fix).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ReportError::AcquisitionTimeout {
                    timeout_secs: options.timeout.as_secs(),
                })
            }
        };

        self.remember(sample);
        Ok(sample)
    }

    fn cached_fix(&self, max_age: Duration) -> Option<PositionSample> {
        let guard = match self.last_fix.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        guard
            .as_ref()
            .filter(|cached| cached.obtained_at.elapsed() < max_age)
            .map(|cached| cached.sample)
    }

    fn remember(&self, sample: PositionSample) {
        let mut guard = match self.last_fix.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(CachedFix {
            sample,
            obtained_at: Instant::now(),
        });
    }
}
