use std::sync::Mutex;

use async_trait::async_trait;
use rand::Rng;

use crate::error::Result;
use crate::models::{AccuracyTier, PositionSample};

use super::LocationProvider;

/// Largest per-fix drift in degrees (roughly 50 m at the equator).
const MAX_STEP_DEGREES: f64 = 0.0005;

/// Stand-in for platform GPS on hosts that have none: a random walk around
/// a home coordinate.
pub struct SimulatedProvider {
    position: Mutex<(f64, f64)>,
}

impl SimulatedProvider {
    pub fn new(home_latitude: f64, home_longitude: f64) -> Self {
        Self {
            position: Mutex::new((home_latitude, home_longitude)),
        }
    }
}

#[async_trait]
impl LocationProvider for SimulatedProvider {
    async fn current_fix(&self, accuracy: AccuracyTier) -> Result<PositionSample> {
        let mut rng = rand::thread_rng();
        let mut guard = match self.position.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let (lat, lon) = *guard;
        let step = -MAX_STEP_DEGREES..=MAX_STEP_DEGREES;
        let next_lat = (lat + rng.gen_range(step.clone())).clamp(-90.0, 90.0);
        let next_lon = lon + rng.gen_range(step);
        *guard = (next_lat, next_lon);

        let mut sample = PositionSample::new(next_lat, next_lon);
        sample.accuracy_m = Some(match accuracy {
            AccuracyTier::High => 5.0,
            AccuracyTier::Balanced => 50.0,
            AccuracyTier::Low => 500.0,
        });
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn walk_stays_near_home() {
        let provider = SimulatedProvider::new(12.9716, 77.5946);

        for _ in 0..10 {
            let sample = provider.current_fix(AccuracyTier::High).await.unwrap();
            assert!((sample.latitude - 12.9716).abs() < 0.01);
            assert!((sample.longitude - 77.5946).abs() < 0.01);
            assert_eq!(sample.accuracy_m, Some(5.0));
        }
    }
}
