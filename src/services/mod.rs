//! Services that touch the outside world
//!
//! File I/O, recovery snapshots, the terminal, signals and logging.

pub mod log_dirs;
pub mod persistence;
pub mod recovery;
pub mod signal_handler;
pub mod terminal_modes;
pub mod time_source;
pub mod tracing_setup;
