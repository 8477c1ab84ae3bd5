//! Process-level helpers that sit beside the timing primitives.

pub mod logger;

pub use logger::{LogConfig, LogOutput, LoggingError, init_logging, try_init_logging};
