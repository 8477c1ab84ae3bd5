use std::str::FromStr;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Stream the subscriber writes formatted events to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdout" | "out" => Ok(LogOutput::Stdout),
            "stderr" | "err" => Ok(LogOutput::Stderr),
            _ => Err(format!("Unknown log output: {}", s)),
        }
    }
}

/// Settings for the process-wide `tracing` subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
    /// Print the event target next to each line
    pub with_target: bool,
    /// Colourise level names
    pub ansi: bool,
    /// Use the compact single-line formatter
    pub compact: bool,
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "timings=info".to_string(),
            with_target: false,
            ansi: true,
            compact: true,
            output: LogOutput::Stderr,
        }
    }
}

impl LogConfig {
    /// Load configuration from `TIMINGS_LOG_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup("TIMINGS_LOG_FILTER")
            && !filter.trim().is_empty()
        {
            config.default_filter = filter;
        }

        if let Some(output) = lookup("TIMINGS_LOG_OUTPUT")
            && let Ok(output) = output.parse()
        {
            config.output = output;
        }

        if let Some(ansi) = lookup("TIMINGS_LOG_ANSI") {
            config.ansi = !matches!(ansi.to_lowercase().as_str(), "0" | "false" | "off");
        }

        config
    }

    /// Resolves the effective filter: `RUST_LOG` wins, then `default_filter`.
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => parse_filter(&self.default_filter),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter `{directive}`: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

fn parse_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        source,
    })
}

/// Installs the global subscriber described by `config`.
pub fn try_init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let env_filter = config.env_filter()?;
    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .with_writer(writer);

    let installed = if config.compact {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|_| LoggingError::AlreadyInstalled)
}

/// Initialise tracing subscriber once per process.
pub fn init_logging() {
    INIT.call_once(|| {
        let config = LogConfig::from_env();
        if let Err(LoggingError::InvalidFilter { .. }) = try_init_logging(&config) {
            let _ = try_init_logging(&LogConfig::default());
        }
    });
}
