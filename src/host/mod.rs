pub mod commands;

pub use commands::HostCommand;
