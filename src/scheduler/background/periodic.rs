use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::Duration;

use crate::scheduler::{Driver, ReportCycle};

use super::task_host::{
    BackgroundFetchConfig, CompletionGuard, TaskCallback, TaskFuture, TaskHost, TaskToken,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Shortest periodic interval the OS honours; shorter requests are coalesced
/// up to it.
pub const MIN_FETCH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Periodic reporting driven by the OS background-fetch facility.
///
/// Registration is process-wide and independent of the foreground
/// lifecycle.
pub struct BackgroundScheduler {
    cycle: ReportCycle,
    host: Arc<dyn TaskHost>,
    config: BackgroundFetchConfig,
    registered: bool,
}

impl BackgroundScheduler {
    pub fn new(
        cycle: ReportCycle,
        host: Arc<dyn TaskHost>,
        mut config: BackgroundFetchConfig,
    ) -> Self {
        if config.minimum_fetch_interval < MIN_FETCH_INTERVAL {
            log_warn!(
                "background fetch interval {}s is below the {}s floor; using the floor",
                config.minimum_fetch_interval.as_secs(),
                MIN_FETCH_INTERVAL.as_secs()
            );
            config.minimum_fetch_interval = MIN_FETCH_INTERVAL;
        }

        Self {
            cycle,
            host,
            config,
            registered: false,
        }
    }

    pub fn config(&self) -> &BackgroundFetchConfig {
        &self.config
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Register the periodic task with the host. Registering twice is a
    /// no-op.
    pub fn configure(&mut self) -> Result<()> {
        if self.registered {
            log_debug!("background fetch already registered");
            return Ok(());
        }

        let cycle = self.cycle.clone();
        let host = Arc::clone(&self.host);
        let callback: TaskCallback = Arc::new(move |token: TaskToken| -> TaskFuture {
            Box::pin(run_periodic_task(cycle.clone(), Arc::clone(&host), token))
        });

        self.host
            .configure(&self.config, callback)
            .context("failed to configure background fetch")?;
        self.registered = true;

        log_info!(
            "Background fetch registered (every {} min, stop_on_terminate={}, headless={})",
            self.config.minimum_fetch_interval.as_secs() / 60,
            self.config.stop_on_terminate,
            self.config.enable_headless
        );
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.registered {
            self.host.stop();
            self.registered = false;
            log_info!("Background fetch stopped");
        }
    }
}

/// Body of one periodic wake-up. Completion is signalled whatever happens
/// inside the cycle, including a panic.
pub async fn run_periodic_task(cycle: ReportCycle, host: Arc<dyn TaskHost>, token: TaskToken) {
    log_info!("[BackgroundFetch] Task triggered: {token}");
    let guard = CompletionGuard::new(host.as_ref(), token);
    cycle.run_logged(Driver::Background).await;
    guard.complete();
}
