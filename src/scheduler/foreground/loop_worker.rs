use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::scheduler::{Driver, ReportCycle};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Tick every `period` until cancelled. The first tick lands one period
/// after start.
///
/// Each tick's cycle runs on its own task, so a slow acquisition or
/// delivery never holds back the next tick and cancelling the loop leaves
/// in-flight cycles to finish.
pub async fn foreground_loop(
    cycle: ReportCycle,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("foreground loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                log_debug!("Posting location from foreground timer");
                let cycle = cycle.clone();
                tokio::spawn(async move {
                    cycle.run_logged(Driver::Foreground).await;
                });
            }
        }
    }
}
