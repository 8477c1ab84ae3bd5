//! Start/stop interval tracking.

use std::time::{Duration, Instant};

use timings_clock::{Clock, SystemClock};
use tracing::trace;

use crate::error::TimingError;

/// Records a start mark and a stop mark and reports the interval between them.
///
/// Marks are overwritten on every call, so one tracker can measure many
/// consecutive intervals; [`Tracker::duration`] always reflects the latest pair.
/// Ordering is the caller's job: the permissive accessors never fail and clamp
/// an inverted or incomplete interval to zero, while
/// [`Tracker::checked_duration`] reports what went wrong.
#[derive(Debug, Clone, Default)]
pub struct Tracker<C: Clock = SystemClock> {
    clock: C,
    start: Option<Instant>,
    end: Option<Instant>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<C: Clock> Tracker<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            start: None,
            end: None,
        }
    }

    /// Records the current instant as the start mark.
    pub fn start(&mut self) {
        self.start = Some(self.clock.now());
    }

    /// Records the current instant as the stop mark.
    pub fn stop(&mut self) {
        self.end = Some(self.clock.now());
    }

    /// Time since the start mark, whether or not the tracker was stopped.
    ///
    /// Zero if the tracker was never started.
    pub fn since(&self) -> Duration {
        self.start
            .map(|start| self.clock.elapsed(start))
            .unwrap_or_default()
    }

    /// Interval between the start and stop marks.
    ///
    /// Zero if either mark is missing or the stop mark precedes the start mark.
    pub fn duration(&self) -> Duration {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                if end < start {
                    trace!(
                        gap = ?start.duration_since(end),
                        "tracker stopped before it started; clamping to zero"
                    );
                }
                end.saturating_duration_since(start)
            }
            _ => Duration::ZERO,
        }
    }

    pub fn checked_duration(&self) -> Result<Duration, TimingError> {
        let start = self.start.ok_or(TimingError::NotStarted)?;
        let end = self.end.ok_or(TimingError::NotStopped)?;
        end.checked_duration_since(start)
            .ok_or_else(|| TimingError::StoppedBeforeStart(start.duration_since(end)))
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.start
    }

    pub fn stopped_at(&self) -> Option<Instant> {
        self.end
    }

    /// True once started and not stopped since the latest start.
    pub fn is_running(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end < start,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Forgets both marks.
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
