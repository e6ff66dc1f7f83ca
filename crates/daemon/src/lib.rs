// commitpulse library: empty-commit heartbeat with batched pushes.

pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod git;
pub mod runtime;
pub mod scheduler;
pub mod shutdown;
