//! OS-driven reporting: the periodic background-fetch task and the headless
//! entry that runs after the process is gone.
//!
//! Both paths end by handing their [`TaskToken`] back to the [`TaskHost`]
//! exactly once. An unfinished task is the one failure the OS punishes, by
//! throttling every later wake-up.

mod headless;
mod interval_host;
mod periodic;
mod task_host;

pub use headless::{run_headless_task, HeadlessEvent};
pub use interval_host::IntervalTaskHost;
pub use periodic::{run_periodic_task, BackgroundScheduler, MIN_FETCH_INTERVAL};
pub use task_host::{
    BackgroundFetchConfig, CompletionGuard, TaskCallback, TaskFuture, TaskHost, TaskToken,
};
