//! Destinations for timing lines.
//!
//! A [`LogSink`] accepts one already formatted line plus the source location of
//! the code that produced it. The two built-in destinations, [`STDOUT`] and
//! [`STDERR`], prefix every line with [`TIMING_PREFIX`] and the caller's
//! `file:line`; the other sinks write the line as given.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Level, debug};

/// Prefix used by the built-in destinations.
pub const TIMING_PREFIX: &str = "[TIMING]";

/// Anything that accepts a formatted timing line.
///
/// Implementations must not fail loudly: write errors are absorbed here and
/// never reach the code being measured.
pub trait LogSink: Send + Sync {
    fn write_line(&self, caller: &'static Location<'static>, line: &str);
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        (**self).write_line(caller, line);
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        (**self).write_line(caller, line);
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        (**self).write_line(caller, line);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A process-wide standard stream destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    name: &'static str,
    stream: Stream,
    prefix: &'static str,
    annotate_location: bool,
}

/// Standard output, `[TIMING]` prefix, caller location annotated.
pub static STDOUT: Destination = Destination::new("stdout", Stream::Stdout)
    .with_prefix(TIMING_PREFIX)
    .with_location(true);

/// Standard error, `[TIMING]` prefix, caller location annotated.
pub static STDERR: Destination = Destination::new("stderr", Stream::Stderr)
    .with_prefix(TIMING_PREFIX)
    .with_location(true);

impl Destination {
    pub const fn new(name: &'static str, stream: Stream) -> Self {
        Self {
            name,
            stream,
            prefix: "",
            annotate_location: false,
        }
    }

    pub const fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub const fn with_location(mut self, annotate: bool) -> Self {
        self.annotate_location = annotate;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn stream(&self) -> Stream {
        self.stream
    }

    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub const fn annotates_location(&self) -> bool {
        self.annotate_location
    }

    /// The exact text written for `line`, without the trailing newline.
    pub fn render(&self, caller: &Location<'_>, line: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + line.len() + 24);
        out.push_str(self.prefix);
        if self.annotate_location {
            let _ = write!(out, "{}:{}: ", short_file(caller.file()), caller.line());
        }
        out.push_str(line);
        out
    }
}

impl LogSink for Destination {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        let rendered = self.render(caller, line);
        // Closed or broken standard streams are ignored.
        let _ = match self.stream {
            Stream::Stdout => writeln!(io::stdout().lock(), "{rendered}"),
            Stream::Stderr => writeln!(io::stderr().lock(), "{rendered}"),
        };
    }
}

fn short_file(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

/// Writes each line to an arbitrary writer, such as a file or socket.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        let mut writer = self.writer.lock();
        if let Err(err) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            debug!(
                error = %err,
                file = caller.file(),
                line = caller.line(),
                "timing line write failed"
            );
        }
    }
}

/// Forwards lines to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

macro_rules! timing_event {
    ($level:expr, $caller:expr, $line:expr) => {
        tracing::event!(
            target: "timings",
            $level,
            file = $caller.file(),
            line = $caller.line(),
            "{}",
            $line
        )
    };
}

impl LogSink for TracingSink {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        match self.level {
            Level::ERROR => timing_event!(Level::ERROR, caller, line),
            Level::WARN => timing_event!(Level::WARN, caller, line),
            Level::DEBUG => timing_event!(Level::DEBUG, caller, line),
            Level::TRACE => timing_event!(Level::TRACE, caller, line),
            _ => timing_event!(Level::INFO, caller, line),
        }
    }
}

/// Keeps every line in memory, along with the location that produced it.
/// Handy for tests and for surfacing timings in a report after the fact.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(&'static Location<'static>, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Caller locations, in the same order as [`MemorySink::lines`].
    pub fn callers(&self) -> Vec<&'static Location<'static>> {
        self.records.lock().iter().map(|(caller, _)| *caller).collect()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.records.lock())
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, caller: &'static Location<'static>, line: &str) {
        self.records.lock().push((caller, line.to_string()));
    }
}
