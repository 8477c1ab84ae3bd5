//! One-shot measurement helpers.
//!
//! Capture a start instant before the work, then hand it to one of these once
//! the work is done:
//!
//! ```
//! let start = timings::now();
//! // ... work ...
//! timings::measure_and_log_out("load_config", start);
//! ```
//!
//! [`ScopeTimer`](crate::ScopeTimer) does the same from a drop guard.

use std::panic::Location;
use std::time::{Duration, Instant};

use timings_clock::{Clock, SystemClock};

use crate::sink::{LogSink, STDERR, STDOUT};

/// The current monotonic instant.
pub fn now() -> Instant {
    Instant::now()
}

/// The text every helper writes: `<name> took <elapsed>`.
pub fn format_line(name: &str, elapsed: Duration) -> String {
    format!("{name} took {elapsed:?}")
}

/// Logs how long it has been since `start`.
#[track_caller]
pub fn measure_and_log<S: LogSink + ?Sized>(name: &str, start: Instant, sink: &S) {
    measure_and_log_with(&SystemClock, name, start, sink);
}

/// Logs how long it has been since `start`, but only when that is strictly
/// longer than `threshold`.
#[track_caller]
pub fn measure_and_log_if_slow<S: LogSink + ?Sized>(
    name: &str,
    start: Instant,
    threshold: Duration,
    sink: &S,
) {
    measure_and_log_if_slow_with(&SystemClock, name, start, threshold, sink);
}

/// [`measure_and_log`] to the [`STDOUT`] destination.
#[track_caller]
pub fn measure_and_log_out(name: &str, start: Instant) {
    measure_and_log(name, start, &STDOUT);
}

/// [`measure_and_log`] to the [`STDERR`] destination.
#[track_caller]
pub fn measure_and_log_err(name: &str, start: Instant) {
    measure_and_log(name, start, &STDERR);
}

/// [`measure_and_log`] reading "now" from `clock`.
#[track_caller]
pub fn measure_and_log_with<C, S>(clock: &C, name: &str, start: Instant, sink: &S)
where
    C: Clock + ?Sized,
    S: LogSink + ?Sized,
{
    let elapsed = clock.elapsed(start);
    sink.write_line(Location::caller(), &format_line(name, elapsed));
}

/// [`measure_and_log_if_slow`] reading "now" from `clock`.
#[track_caller]
pub fn measure_and_log_if_slow_with<C, S>(
    clock: &C,
    name: &str,
    start: Instant,
    threshold: Duration,
    sink: &S,
) where
    C: Clock + ?Sized,
    S: LogSink + ?Sized,
{
    let elapsed = clock.elapsed(start);
    if elapsed > threshold {
        sink.write_line(Location::caller(), &format_line(name, elapsed));
    }
}

/// Runs `f`, logs how long it took and hands back its output.
#[track_caller]
pub fn measure_call<S, F, T>(name: &str, sink: &S, f: F) -> T
where
    S: LogSink + ?Sized,
    F: FnOnce() -> T,
{
    let caller = Location::caller();
    let start = Instant::now();
    let output = f();
    sink.write_line(caller, &format_line(name, start.elapsed()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use timings_clock::ManualClock;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("parse", Duration::from_millis(1500)),
            "parse took 1.5s"
        );
        assert_eq!(
            format_line("parse", Duration::from_millis(250)),
            "parse took 250ms"
        );
    }

    #[test]
    fn test_measure_and_log_always_writes() {
        let sink = MemorySink::new();
        measure_and_log("instant", now(), &sink);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("instant took "));
        assert!(lines[0].len() > "instant took ".len());
    }

    #[test]
    fn test_measure_and_log_with_manual_clock() {
        let clock = ManualClock::new();
        let sink = MemorySink::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(2345));

        measure_and_log_with(&clock, "render", start, &sink);
        assert_eq!(sink.lines(), vec!["render took 2.345s"]);
    }

    #[test]
    fn test_if_slow_skips_fast_operations() {
        let clock = ManualClock::new();
        let sink = MemorySink::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(50));

        measure_and_log_if_slow_with(&clock, "fast", start, Duration::from_millis(100), &sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_if_slow_logs_slow_operations() {
        let clock = ManualClock::new();
        let sink = MemorySink::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(150));

        measure_and_log_if_slow_with(&clock, "slow", start, Duration::from_millis(100), &sink);
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("slow"));
        assert_eq!(lines[0], "slow took 150ms");
    }

    #[test]
    fn test_if_slow_exact_threshold_does_not_log() {
        let clock = ManualClock::new();
        let sink = MemorySink::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(100));

        measure_and_log_if_slow_with(&clock, "edge", start, Duration::from_millis(100), &sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_if_slow_with_real_clock() {
        let sink = MemorySink::new();
        measure_and_log_if_slow("never", now(), Duration::from_secs(3600), &sink);
        assert!(sink.is_empty());

        let start = now();
        std::thread::sleep(Duration::from_millis(5));
        measure_and_log_if_slow("always", start, Duration::ZERO, &sink);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_future_start_logs_zero() {
        let clock = ManualClock::new();
        let sink = MemorySink::new();
        let start = clock.now() + Duration::from_secs(1);

        measure_and_log_with(&clock, "skewed", start, &sink);
        assert_eq!(sink.lines(), vec!["skewed took 0ns"]);
    }

    #[test]
    fn test_measure_call_returns_output() {
        let sink = MemorySink::new();
        let value = measure_call("compute", &sink, || 6 * 7);

        assert_eq!(value, 42);
        assert_eq!(sink.len(), 1);
        assert!(sink.lines()[0].starts_with("compute took "));
    }

    #[test]
    fn test_helpers_report_their_caller() {
        let sink = MemorySink::new();

        let log_line = line!() + 1;
        measure_and_log("plain", now(), &sink);
        let earlier = now();
        std::thread::sleep(Duration::from_millis(2));
        let slow_line = line!() + 1;
        measure_and_log_if_slow("slow", earlier, Duration::ZERO, &sink);
        let call_line = line!() + 1;
        measure_call("closure", &sink, || ());

        let callers = sink.callers();
        assert_eq!(callers.len(), 3);
        assert!(callers.iter().all(|caller| caller.file() == file!()));
        assert_eq!(callers[0].line(), log_line);
        assert_eq!(callers[1].line(), slow_line);
        assert_eq!(callers[2].line(), call_line);
    }

    #[test]
    fn test_builtin_destinations_annotate_caller() {
        let clock = ManualClock::new();
        let sink = MemorySink::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(250));

        let call_line = line!() + 1;
        measure_and_log_with(&clock, "load", start, &sink);

        let caller = sink.callers()[0];
        let lines = sink.lines();
        let line = &lines[0];
        assert_eq!(
            STDOUT.render(caller, line),
            format!("[TIMING]track.rs:{call_line}: load took 250ms")
        );
        assert_eq!(
            STDERR.render(caller, line),
            format!("[TIMING]track.rs:{call_line}: load took 250ms")
        );
    }

    #[test]
    fn test_builtin_destination_helpers_do_not_panic() {
        let start = now();
        measure_and_log_out("stdout_helper", start);
        measure_and_log_err("stderr_helper", start);
    }
}
