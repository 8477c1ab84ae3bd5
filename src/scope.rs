//! Drop guard that logs the lifetime of a scope.

use std::borrow::Cow;
use std::panic::Location;
use std::time::{Duration, Instant};

use timings_clock::{Clock, SystemClock};

use crate::sink::{Destination, LogSink, STDERR, STDOUT};
use crate::track::format_line;

/// Logs `<name> took <elapsed>` to its sink when dropped.
///
/// ```
/// use timings::{MemorySink, ScopeTimer};
///
/// let sink = MemorySink::new();
/// {
///     let _timer = ScopeTimer::new("handshake", &sink);
///     // ... work ...
/// }
/// assert_eq!(sink.len(), 1);
/// ```
#[must_use = "the timer logs when dropped; binding it to `_` drops it immediately"]
pub struct ScopeTimer<'a, S: LogSink + ?Sized, C: Clock = SystemClock> {
    name: Cow<'a, str>,
    sink: &'a S,
    clock: C,
    start: Instant,
    threshold: Option<Duration>,
    caller: &'static Location<'static>,
    armed: bool,
}

impl<'a, S: LogSink + ?Sized> ScopeTimer<'a, S> {
    #[track_caller]
    pub fn new(name: impl Into<Cow<'a, str>>, sink: &'a S) -> Self {
        Self::with_clock(name, sink, SystemClock)
    }
}

impl<'a, S: LogSink + ?Sized, C: Clock> ScopeTimer<'a, S, C> {
    #[track_caller]
    pub fn with_clock(name: impl Into<Cow<'a, str>>, sink: &'a S, clock: C) -> Self {
        let start = clock.now();
        Self {
            name: name.into(),
            sink,
            clock,
            start,
            threshold: None,
            caller: Location::caller(),
            armed: true,
        }
    }

    /// Only log if the scope outlives `threshold` (strictly).
    pub fn if_slower_than(mut self, threshold: Duration) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn started_at(&self) -> Instant {
        self.start
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed(self.start)
    }

    /// Where the timer was created; this is the location reported on drop.
    pub fn caller(&self) -> &'static Location<'static> {
        self.caller
    }

    pub fn sink(&self) -> &'a S {
        self.sink
    }

    /// Drops the timer without logging anything.
    pub fn cancel(mut self) {
        self.armed = false;
    }
}

impl<S: LogSink + ?Sized, C: Clock> Drop for ScopeTimer<'_, S, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let elapsed = self.elapsed();
        if self.threshold.is_some_and(|threshold| elapsed <= threshold) {
            return;
        }
        self.sink
            .write_line(self.caller, &format_line(&self.name, elapsed));
    }
}

/// A [`ScopeTimer`] bound to the [`STDOUT`] destination.
#[track_caller]
pub fn scope_out(name: &str) -> ScopeTimer<'_, Destination> {
    ScopeTimer::new(name, &STDOUT)
}

/// A [`ScopeTimer`] bound to the [`STDERR`] destination.
#[track_caller]
pub fn scope_err(name: &str) -> ScopeTimer<'_, Destination> {
    ScopeTimer::new(name, &STDERR)
}
