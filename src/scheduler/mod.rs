//! Drivers that decide when a position is sampled and delivered.
//!
//! The foreground driver ticks on a short fixed period while the app is
//! active. The background driver is woken by the OS task facility, and the
//! headless entry runs after the process has been terminated.

pub mod background;
mod cycle;
pub mod foreground;

pub use background::{
    run_headless_task, BackgroundFetchConfig, BackgroundScheduler, HeadlessEvent,
    IntervalTaskHost, TaskCallback, TaskFuture, TaskHost, TaskToken,
};
pub use cycle::{Driver, ReportCycle};
pub use foreground::{ForegroundScheduler, DEFAULT_FOREGROUND_PERIOD};
