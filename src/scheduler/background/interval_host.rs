use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::Context;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::task_host::{BackgroundFetchConfig, TaskCallback, TaskHost, TaskToken};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Time a woken task gets before it counts as never having finished.
const COMPLETION_GRACE: Duration = Duration::from_secs(30);

/// Most recent completions kept for inspection and duplicate detection.
const FINISHED_LEDGER_CAP: usize = 256;

#[derive(Default)]
struct HostState {
    callback: Option<TaskCallback>,
    loop_token: Option<CancellationToken>,
    pending: HashMap<TaskToken, Instant>,
    recent: VecDeque<TaskToken>,
    recent_set: HashSet<TaskToken>,
    finished_total: u64,
}

impl HostState {
    fn record_finished(&mut self, token: TaskToken) {
        if self.recent.len() == FINISHED_LEDGER_CAP {
            if let Some(oldest) = self.recent.pop_front() {
                self.recent_set.remove(&oldest);
            }
        }
        self.recent_set.insert(token.clone());
        self.recent.push_back(token);
        self.finished_total += 1;
    }
}

/// Background-fetch facility for hosts without one: wakes the registered
/// task on a tokio interval and keeps the completion books.
///
/// Tokens still open after the grace period are reported as
/// `TaskCompletionOmitted`, the condition a real OS penalises.
#[derive(Clone, Default)]
pub struct IntervalTaskHost {
    state: Arc<Mutex<HostState>>,
}

impl IntervalTaskHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the registered task now, outside the periodic schedule.
    pub fn trigger(&self) -> Option<TaskToken> {
        dispatch(&self.state)
    }

    /// The most recently finished tokens, oldest first.
    pub fn finished(&self) -> Vec<TaskToken> {
        lock(&self.state).recent.iter().cloned().collect()
    }

    /// Every completion since the host was created.
    pub fn finished_count(&self) -> u64 {
        lock(&self.state).finished_total
    }

    /// Tokens handed out and not yet finished.
    pub fn pending(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

impl TaskHost for IntervalTaskHost {
    fn configure(
        &self,
        config: &BackgroundFetchConfig,
        callback: TaskCallback,
    ) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("background fetch needs a running tokio runtime")?;

        let interval = config.minimum_fetch_interval;
        let cancel_token = CancellationToken::new();
        {
            let mut state = lock(&self.state);
            if let Some(previous) = state.loop_token.replace(cancel_token.clone()) {
                previous.cancel();
            }
            state.callback = Some(callback);
        }

        let shared = Arc::clone(&self.state);
        runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => break,
                    _ = ticker.tick() => {
                        dispatch(&shared);
                    }
                }
            }
        });

        Ok(())
    }

    fn finish(&self, token: &TaskToken) {
        let mut state = lock(&self.state);
        if state.recent_set.contains(token) {
            log_warn!("[BackgroundFetch] task {token} finished more than once");
            return;
        }
        if state.pending.remove(token).is_none() {
            log_debug!("[BackgroundFetch] finishing task {token} this host did not dispatch");
        }
        state.record_finished(token.clone());
        log_info!("[BackgroundFetch] finish {token}");
    }

    fn stop(&self) {
        let mut state = lock(&self.state);
        if let Some(token) = state.loop_token.take() {
            token.cancel();
        }
        state.callback = None;
    }
}

fn lock(state: &Mutex<HostState>) -> MutexGuard<'_, HostState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn dispatch(state: &Arc<Mutex<HostState>>) -> Option<TaskToken> {
    let (callback, token) = {
        let mut guard = lock(state);
        report_omitted(&mut guard);

        let callback = guard.callback.clone()?;
        let token = TaskToken::new();
        guard.pending.insert(token.clone(), Instant::now());
        (callback, token)
    };

    tokio::spawn(callback(token.clone()));
    Some(token)
}

fn report_omitted(state: &mut HostState) {
    state.pending.retain(|token, woken_at| {
        let overdue = woken_at.elapsed() > COMPLETION_GRACE;
        if overdue {
            log_error!("TaskCompletionOmitted: task {token} never signalled completion");
        }
        !overdue
    });
}
