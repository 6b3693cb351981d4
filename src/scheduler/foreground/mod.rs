mod controller;
mod loop_worker;

pub use controller::{ForegroundScheduler, DEFAULT_FOREGROUND_PERIOD};
