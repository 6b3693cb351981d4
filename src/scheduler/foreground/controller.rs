use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::scheduler::ReportCycle;

use super::loop_worker::foreground_loop;

const ENABLE_LOGS: bool = true;

use crate::log_info;

pub const DEFAULT_FOREGROUND_PERIOD: Duration = Duration::from_secs(10);

/// Fixed-period reporting while the app is active.
///
/// The timer handle lives here and nowhere else; only `start` and `stop`
/// touch it.
pub struct ForegroundScheduler {
    cycle: ReportCycle,
    period: Duration,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl ForegroundScheduler {
    pub fn new(cycle: ReportCycle, period: Duration) -> Self {
        Self {
            cycle,
            period,
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Install the timer, replacing any timer already installed.
    pub fn start(&mut self) {
        self.clear_timer();

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(foreground_loop(
            self.cycle.clone(),
            self.period,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        log_info!("Foreground timer started ({}s period)", self.period.as_secs());
    }

    /// Remove the timer. Cycles already in flight run to completion.
    pub fn stop(&mut self) {
        if self.clear_timer() {
            log_info!("Foreground timer stopped");
        }
    }

    fn clear_timer(&mut self) -> bool {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        // The loop exits on its own once cancelled; dropping the handle
        // detaches it.
        self.handle.take().is_some()
    }
}

impl Drop for ForegroundScheduler {
    fn drop(&mut self) {
        self.clear_timer();
    }
}
