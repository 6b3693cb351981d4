//! Test doubles shared by the scheduler and lifecycle unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use tokio::time::{self, Duration};

use crate::delivery::LocationSink;
use crate::error::{ReportError, Result};
use crate::models::{AccuracyTier, AcquireOptions, DeliveryRequest, DeliveryResult, PositionSample};
use crate::position::{LocationProvider, PermissionGate, PositionSource};
use crate::scheduler::{ReportCycle, TaskCallback, TaskHost, TaskToken};

/// Provider that hands out a fresh fix on every call and counts calls.
pub struct CountingProvider {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for CountingProvider {
    async fn current_fix(&self, _accuracy: AccuracyTier) -> Result<PositionSample> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ReportError::AcquisitionUnavailable("no satellites".into()));
        }
        Ok(PositionSample::new(12.97 + call as f64 * 0.001, 77.59))
    }
}

/// Provider that panics, for exercising unwinding paths.
pub struct PanickingProvider;

#[async_trait]
impl LocationProvider for PanickingProvider {
    async fn current_fix(&self, _accuracy: AccuracyTier) -> Result<PositionSample> {
        panic!("location provider crashed");
    }
}

/// Sink that records every request it is given.
pub struct RecordingSink {
    started: AtomicUsize,
    delivered: Mutex<Vec<DeliveryRequest>>,
    delay: Duration,
    reject: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Self::build(Duration::ZERO, false)
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Self::build(delay, false)
    }

    pub fn rejecting() -> Arc<Self> {
        Self::build(Duration::ZERO, true)
    }

    fn build(delay: Duration, reject: bool) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            delivered: Mutex::new(Vec::new()),
            delay,
            reject,
        })
    }

    /// Requests that reached `send`, finished or not.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Requests that completed delivery.
    pub fn len(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<DeliveryRequest> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocationSink for RecordingSink {
    async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryResult> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            time::sleep(self.delay).await;
        }
        if self.reject {
            return Err(ReportError::DeliveryRejected {
                status: 500,
                body: "collector down".into(),
            });
        }

        let mut delivered = self.delivered.lock().unwrap();
        delivered.push(request.clone());
        Ok(DeliveryResult {
            ok: true,
            http_status: Some(201),
            body: Some(serde_json::json!({"location": {"id": delivered.len()}})),
        })
    }
}

/// Task host that only records completions.
#[derive(Default)]
pub struct RecordingHost {
    finished: Mutex<Vec<TaskToken>>,
    configured: AtomicUsize,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn finished(&self) -> Vec<TaskToken> {
        self.finished.lock().unwrap().clone()
    }

    pub fn configured(&self) -> usize {
        self.configured.load(Ordering::SeqCst)
    }
}

impl TaskHost for RecordingHost {
    fn configure(
        &self,
        _config: &crate::scheduler::BackgroundFetchConfig,
        _callback: TaskCallback,
    ) -> anyhow::Result<()> {
        self.configured.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn finish(&self, token: &TaskToken) {
        self.finished.lock().unwrap().push(token.clone());
    }

    fn stop(&self) {}
}

pub fn report_cycle(
    provider: Arc<dyn LocationProvider>,
    sink: Arc<dyn LocationSink>,
    permission: PermissionGate,
) -> ReportCycle {
    let source = Arc::new(PositionSource::new(provider, permission));
    ReportCycle::new(source, sink, AcquireOptions::default())
}
