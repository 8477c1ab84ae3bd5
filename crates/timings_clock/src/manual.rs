//! A clock that only moves when told to.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::Clock;

/// Deterministic clock for tests and simulations.
///
/// Instants are reported as a fixed origin plus an offset that only changes
/// through [`ManualClock::advance`] or [`ManualClock::set_offset`]. Clones share
/// the same offset, so a clone handed to a tracker follows the original.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose offset zero corresponds to `origin`.
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn offset(&self) -> Duration {
        *self.offset.lock()
    }

    /// Moves the clock forward. Stops at the latest instant the platform can
    /// represent instead of overflowing.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock();
        *offset = self.representable(offset.saturating_add(by));
    }

    /// Moves the clock to `origin + offset`, capped like [`ManualClock::advance`].
    /// Moving backwards is allowed so callers can exercise out-of-order marks.
    pub fn set_offset(&self, offset: Duration) {
        *self.offset.lock() = self.representable(offset);
    }

    /// Largest offset not above `wanted` that `origin` can be shifted by.
    fn representable(&self, wanted: Duration) -> Duration {
        if self.origin.checked_add(wanted).is_some() {
            return wanted;
        }
        let (mut fits, mut overflows) = (Duration::ZERO, wanted);
        while overflows - fits > Duration::from_nanos(1) {
            let mid = fits + (overflows - fits) / 2;
            if self.origin.checked_add(mid).is_some() {
                fits = mid;
            } else {
                overflows = mid;
            }
        }
        fits
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock();
        self.origin.checked_add(offset).unwrap_or(self.origin)
    }
}
