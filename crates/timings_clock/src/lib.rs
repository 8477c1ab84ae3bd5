//! Clock abstraction shared by the timing helpers.
//!
//! Everything that reads "now" goes through [`Clock`], so callers can swap the
//! monotonic [`SystemClock`] for a [`ManualClock`] when they need exact,
//! repeatable intervals.

pub mod manual;

pub use manual::ManualClock;

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of monotonic instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Time elapsed between `start` and [`Clock::now`].
    ///
    /// Saturates to zero when `start` lies in this clock's future.
    fn elapsed(&self, start: Instant) -> Duration {
        self.now().saturating_duration_since(start)
    }
}

/// The process monotonic clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl SystemClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_elapsed_saturates_for_future_start() {
        let clock = SystemClock::new();
        let future = clock.now() + Duration::from_secs(60);
        assert_eq!(clock.elapsed(future), Duration::ZERO);
    }

    #[test]
    fn test_elapsed_through_trait_object() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let start = clock.now();
        assert_eq!(clock.elapsed(start), Duration::ZERO);
    }
}
