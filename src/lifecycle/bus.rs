use std::sync::Arc;

use tokio::sync::watch;

use crate::models::HostLifecycle;

/// Lifecycle notifications from the host shell.
///
/// Holds the latest state, so a late subscriber still learns where the app
/// is. Bursts of changes may be coalesced; subscribers only ever act on the
/// most recent state.
#[derive(Clone)]
pub struct LifecycleBus {
    tx: Arc<watch::Sender<HostLifecycle>>,
}

impl LifecycleBus {
    pub fn new(initial: HostLifecycle) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, state: HostLifecycle) {
        self.tx.send_replace(state);
    }

    pub fn current(&self) -> HostLifecycle {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> LifecycleSubscription {
        LifecycleSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// A live subscription. Dropping it unsubscribes.
pub struct LifecycleSubscription {
    rx: watch::Receiver<HostLifecycle>,
}

impl LifecycleSubscription {
    pub fn current(&self) -> HostLifecycle {
        *self.rx.borrow()
    }

    /// Wait for the next state. `None` once every bus handle is gone.
    pub async fn next(&mut self) -> Option<HostLifecycle> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
