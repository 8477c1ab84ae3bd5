use std::time::Duration;

use thiserror::Error;

/// Ordering problems reported by [`Tracker::checked_duration`](crate::Tracker::checked_duration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("tracker was never started")]
    NotStarted,
    #[error("tracker was never stopped")]
    NotStopped,
    #[error("tracker stopped {0:?} before it started")]
    StoppedBeforeStart(Duration),
}
