//! Elapsed-time measurement helpers.
//!
//! [`Tracker`] records a start and a stop mark; the free functions in
//! [`track`] log how long one operation took, optionally only when it ran
//! longer than a threshold. Lines look like `load took 1.5s` and go to any
//! [`LogSink`], including the `[TIMING]`-prefixed [`STDOUT`] and [`STDERR`]
//! destinations.

pub mod error;
pub mod scope;
pub mod sink;
pub mod track;
pub mod tracker;

pub use error::TimingError;
pub use scope::{ScopeTimer, scope_err, scope_out};
pub use sink::{
    Destination, LogSink, MemorySink, STDERR, STDOUT, Stream, TIMING_PREFIX, TracingSink,
    WriterSink,
};
pub use track::{
    format_line, measure_and_log, measure_and_log_err, measure_and_log_if_slow,
    measure_and_log_if_slow_with, measure_and_log_out, measure_and_log_with, measure_call, now,
};
pub use tracker::Tracker;

pub use timings_clock::{Clock, ManualClock, SystemClock};
pub use timings_utils::{LogConfig, LogOutput, LoggingError, init_logging, try_init_logging};
