use std::{fmt, sync::Arc};

use crate::delivery::LocationSink;
use crate::error::{ReportError, Result};
use crate::models::{AcquireOptions, DeliveryRequest, DeliveryResult, PlaceRecord};
use crate::position::PositionSource;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Which execution mode produced a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Foreground,
    Background,
    Headless,
}

impl Driver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Foreground => "foreground",
            Driver::Background => "background",
            Driver::Headless => "headless",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample-and-deliver pass, shared by the foreground and background
/// drivers. Cloning is cheap; all clones share the same source and sink.
#[derive(Clone)]
pub struct ReportCycle {
    source: Arc<PositionSource>,
    sink: Arc<dyn LocationSink>,
    options: AcquireOptions,
    place: PlaceRecord,
}

impl ReportCycle {
    pub fn new(
        source: Arc<PositionSource>,
        sink: Arc<dyn LocationSink>,
        options: AcquireOptions,
    ) -> Self {
        Self {
            source,
            sink,
            options,
            place: PlaceRecord::fixed(),
        }
    }

    /// Acquire, then deliver. Stops at the first failure.
    pub async fn run(&self) -> Result<DeliveryResult> {
        let sample = self.source.acquire(&self.options).await?;
        let request = DeliveryRequest::from_sample(&sample, self.place.clone());
        self.sink.send(&request).await
    }

    /// Run once and swallow any failure after logging which driver and
    /// stage it came from.
    pub async fn run_logged(&self, driver: Driver) -> Option<DeliveryResult> {
        match self.run().await {
            Ok(result) => {
                log_info!(
                    "[{driver}] location delivered (HTTP {:?}, id {:?})",
                    result.http_status,
                    result.location_id()
                );
                Some(result)
            }
            Err(err @ ReportError::PermissionDenied) => {
                log_warn!("[{driver}] {} stage skipped: {err}", err.stage().as_str());
                None
            }
            Err(err) => {
                log_error!("[{driver}] {} stage failed: {err}", err.stage().as_str());
                None
            }
        }
    }
}
