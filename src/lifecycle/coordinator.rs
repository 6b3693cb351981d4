use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::{HostLifecycle, SchedulerState};
use crate::scheduler::ForegroundScheduler;

use super::{LifecycleBus, LifecycleSubscription};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Starts and stops the foreground driver as the app moves between active
/// and background. The background driver is registered process-wide and is
/// not touched here.
pub struct LifecycleCoordinator {
    foreground: ForegroundScheduler,
    state: SchedulerState,
    subscription: Option<LifecycleSubscription>,
    state_tx: watch::Sender<SchedulerState>,
}

impl LifecycleCoordinator {
    /// Subscribe to `bus`; the host's current state becomes the initial
    /// state. A host that reports `inactive` at launch counts as active.
    pub fn new(foreground: ForegroundScheduler, bus: &LifecycleBus) -> Self {
        let subscription = bus.subscribe();
        let state = subscription
            .current()
            .scheduler_state()
            .unwrap_or(SchedulerState::Active);
        let (state_tx, _rx) = watch::channel(state);

        Self {
            foreground,
            state,
            subscription: Some(subscription),
            state_tx,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn watch_state(&self) -> watch::Receiver<SchedulerState> {
        self.state_tx.subscribe()
    }

    pub fn is_foreground_running(&self) -> bool {
        self.foreground.is_running()
    }

    /// Bring the foreground driver in line with the initial state.
    pub fn activate(&mut self) {
        if self.state == SchedulerState::Active {
            self.foreground.start();
        }
    }

    pub fn apply(&mut self, event: HostLifecycle) {
        let Some(next) = event.scheduler_state() else {
            log_debug!("lifecycle event '{event}' does not change the driver");
            return;
        };

        match next {
            SchedulerState::Background => {
                log_info!("App moved to background");
                self.foreground.stop();
            }
            SchedulerState::Active => {
                log_info!("App moved to foreground");
                self.foreground.start();
            }
        }

        self.state = next;
        self.state_tx.send_replace(next);
    }

    /// Follow the bus until `shutdown` fires or the bus goes away, then
    /// release the subscription and stop the foreground driver.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let Some(mut subscription) = self.subscription.take() else {
            return;
        };

        self.activate();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                event = subscription.next() => match event {
                    Some(event) => self.apply(event),
                    None => break,
                },
            }
        }

        drop(subscription);
        self.shutdown();
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub fn shutdown(&mut self) {
        self.subscription = None;
        self.foreground.stop();
        log_info!("Lifecycle coordinator stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PermissionGate;
    use crate::scheduler::DEFAULT_FOREGROUND_PERIOD;
    use crate::test_utils::{report_cycle, CountingProvider, RecordingSink};
    use std::sync::Arc;
    use tokio::time::{self, Duration};

    fn coordinator(bus: &LifecycleBus, sink: Arc<RecordingSink>) -> LifecycleCoordinator {
        let cycle = report_cycle(CountingProvider::new(), sink, PermissionGate::granted());
        LifecycleCoordinator::new(
            ForegroundScheduler::new(cycle, DEFAULT_FOREGROUND_PERIOD),
            bus,
        )
    }

    #[tokio::test]
    async fn initial_state_follows_host() {
        let bus = LifecycleBus::new(HostLifecycle::Background);
        let mut coordinator = coordinator(&bus, RecordingSink::new());

        coordinator.activate();

        assert_eq!(coordinator.state(), SchedulerState::Background);
        assert!(!coordinator.is_foreground_running());
    }

    #[tokio::test(start_paused = true)]
    async fn round_trip_leaves_exactly_one_timer() {
        let bus = LifecycleBus::new(HostLifecycle::Active);
        let sink = RecordingSink::new();
        let mut coordinator = coordinator(&bus, sink.clone());

        coordinator.activate();
        coordinator.apply(HostLifecycle::Background);
        coordinator.apply(HostLifecycle::Active);
        assert!(coordinator.is_foreground_running());

        time::sleep(Duration::from_secs(35)).await;

        assert_eq!(sink.len(), 3);
    }

    #[tokio::test]
    async fn running_iff_last_transition_was_into_active() {
        let events = [
            HostLifecycle::Active,
            HostLifecycle::Inactive,
            HostLifecycle::Background,
        ];

        // Every sequence of up to four events, from both initial states.
        for initial in [HostLifecycle::Active, HostLifecycle::Background] {
            for len in 0..=4u32 {
                for code in 0..3usize.pow(len) {
                    let bus = LifecycleBus::new(initial);
                    let mut coordinator = coordinator(&bus, RecordingSink::new());
                    coordinator.activate();

                    let mut expected = initial == HostLifecycle::Active;
                    let mut rest = code;
                    for _ in 0..len {
                        let event = events[rest % 3];
                        rest /= 3;
                        coordinator.apply(event);
                        match event.scheduler_state() {
                            Some(SchedulerState::Active) => expected = true,
                            Some(SchedulerState::Background) => expected = false,
                            None => {}
                        }
                    }

                    assert_eq!(
                        coordinator.is_foreground_running(),
                        expected,
                        "initial {initial}, sequence code {code}, len {len}"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn run_follows_bus_and_releases_on_shutdown() {
        let bus = LifecycleBus::new(HostLifecycle::Active);
        let coordinator = coordinator(&bus, RecordingSink::new());
        let mut states = coordinator.watch_state();
        let shutdown = CancellationToken::new();

        let handle = coordinator.spawn(shutdown.clone());

        bus.publish(HostLifecycle::Background);
        states.changed().await.unwrap();
        assert_eq!(*states.borrow(), SchedulerState::Background);

        shutdown.cancel();
        handle.await.unwrap();
        assert!(states.has_changed().is_err());
    }
}
