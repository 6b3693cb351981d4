use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
    /// Horizontal accuracy in metres, when the provider reports one.
    pub accuracy_m: Option<f64>,
}

impl PositionSample {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            captured_at: Utc::now(),
            accuracy_m: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AccuracyTier {
    #[default]
    High,
    Balanced,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireOptions {
    pub timeout: Duration,
    /// A cached fix younger than this is returned without asking the provider.
    pub max_cache_age: Duration,
    pub accuracy: AccuracyTier,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_cache_age: Duration::from_millis(5000),
            accuracy: AccuracyTier::High,
        }
    }
}
