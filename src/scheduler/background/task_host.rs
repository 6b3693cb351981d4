use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one OS task invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskToken(String);

impl TaskToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskToken {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TaskToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundFetchConfig {
    pub minimum_fetch_interval: Duration,
    /// Keep the registration alive after the app is terminated.
    pub stop_on_terminate: bool,
    pub start_on_boot: bool,
    /// Allow the headless entry to run once the process is gone.
    pub enable_headless: bool,
}

impl Default for BackgroundFetchConfig {
    fn default() -> Self {
        Self {
            minimum_fetch_interval: Duration::from_secs(15 * 60),
            stop_on_terminate: false,
            start_on_boot: true,
            enable_headless: true,
        }
    }
}

pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Invoked by the host once per wake-up with that wake-up's token.
pub type TaskCallback = Arc<dyn Fn(TaskToken) -> TaskFuture + Send + Sync>;

/// The OS background task facility.
pub trait TaskHost: Send + Sync {
    /// Register the periodic task.
    fn configure(
        &self,
        config: &BackgroundFetchConfig,
        callback: TaskCallback,
    ) -> anyhow::Result<()>;

    /// Signal that the task identified by `token` is done.
    fn finish(&self, token: &TaskToken);

    /// Drop the registration; no further wake-ups.
    fn stop(&self);
}

/// Signals completion for one token exactly once: on `complete`, or on drop
/// if the task body returned early or unwound.
pub struct CompletionGuard<'a> {
    host: &'a dyn TaskHost,
    token: Option<TaskToken>,
}

impl<'a> CompletionGuard<'a> {
    pub fn new(host: &'a dyn TaskHost, token: TaskToken) -> Self {
        Self {
            host,
            token: Some(token),
        }
    }

    pub fn complete(mut self) {
        self.signal();
    }

    fn signal(&mut self) {
        if let Some(token) = self.token.take() {
            self.host.finish(&token);
        }
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.signal();
    }
}
