use serde::{Deserialize, Serialize};

use crate::delivery::LocationSink;
use crate::models::{DeliveryRequest, DeliveryResult, PlaceRecord};

use super::task_host::{CompletionGuard, TaskHost, TaskToken};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// What the OS hands the headless entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeadlessEvent {
    pub task_id: TaskToken,
    /// Set when the OS is about to reclaim the task's time budget.
    #[serde(default)]
    pub timeout: bool,
}

impl HeadlessEvent {
    pub fn new(task_id: TaskToken) -> Self {
        Self {
            task_id,
            timeout: false,
        }
    }
}

/// Run after the app process has been terminated.
///
/// Takes nothing from the live scheduler: no position source is reachable,
/// so it always delivers the fallback coordinate pair with the fixed place
/// record, then signals completion.
pub async fn run_headless_task(
    event: HeadlessEvent,
    sink: &dyn LocationSink,
    host: &dyn TaskHost,
) -> Option<DeliveryResult> {
    let HeadlessEvent { task_id, timeout } = event;
    log_info!("[BackgroundFetch HeadlessTask] Start: {task_id}");
    let guard = CompletionGuard::new(host, task_id);

    if timeout {
        log_warn!("[BackgroundFetch HeadlessTask] Timed out before running; finishing");
        guard.complete();
        return None;
    }

    let request = DeliveryRequest::fallback(PlaceRecord::fixed());
    let outcome = match sink.send(&request).await {
        Ok(result) => {
            log_info!("[BackgroundFetch HeadlessTask] API Response: {:?}", result.body);
            Some(result)
        }
        Err(err) => {
            log_error!("[BackgroundFetch HeadlessTask] Error: {err}");
            None
        }
    };

    guard.complete();
    outcome
}
