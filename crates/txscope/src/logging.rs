//! Logging configuration for txscope
//!
//! Transaction lifecycle events (begin, commit, rollback, implicit rollback
//! on drop) are emitted through `tracing`. This module installs a subscriber
//! for them, writing to stdout, a daily-rotated file, or both.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_LOG_FILE: &str = "txscope.log";

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a file with daily rotation
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style, applied to every output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format (default)
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter, e.g. `"debug"` or `"txscope_core=trace"`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

/// Resolved sinks: which outputs get a formatting layer, and in which style
#[derive(Debug, PartialEq, Eq)]
struct Sinks<'a> {
    stdout: Option<LogFormat>,
    file: Option<(&'a Path, LogFormat)>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Info level to stdout
    pub fn info() -> Self {
        Self::default()
    }

    /// Debug level, which includes every begin/commit/rollback
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Warn level, which still reports implicit rollbacks
    pub fn warn() -> Self {
        Self::default().with_level("warn")
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    fn sinks(&self) -> Sinks<'_> {
        match &self.output {
            LogOutput::Stdout => Sinks {
                stdout: Some(self.format),
                file: None,
            },
            LogOutput::File(path) => Sinks {
                stdout: None,
                file: Some((path.as_path(), self.format)),
            },
            LogOutput::Both(path) => Sinks {
                stdout: Some(self.format),
                file: Some((path.as_path(), self.format)),
            },
        }
    }

    /// Initialize global logging with this configuration
    ///
    /// `RUST_LOG` overrides the configured level. An unparsable level falls
    /// back to `info`.
    ///
    /// Returns a guard that must be kept alive while logging to a file; when
    /// it is dropped the background writer is flushed and shut down.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use txscope::logging::{LogConfig, LogFormat};
    ///
    /// let _guard = LogConfig::debug()
    ///     .with_both("logs/txscope.log")
    ///     .with_format(LogFormat::Compact)
    ///     .init();
    /// ```
    pub fn init(self) -> Option<WorkerGuard> {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let env_filter = level_filter(env.as_deref(), &self.level);
        let sinks = self.sinks();

        let (writer, guard) = match sinks.file {
            Some((path, _)) => {
                let (writer, guard) = tracing_appender::non_blocking(file_appender(path));
                (Some(writer), Some(guard))
            }
            None => (None, None),
        };
        let file_format = sinks.file.map(|(_, format)| format);

        // Unused Option layers are None and stay inert
        tracing_subscriber::registry()
            .with(env_filter)
            .with((sinks.stdout == Some(LogFormat::Pretty)).then(|| fmt::layer().pretty()))
            .with((sinks.stdout == Some(LogFormat::Compact)).then(|| fmt::layer().compact()))
            .with(
                writer
                    .clone()
                    .filter(|_| file_format == Some(LogFormat::Pretty))
                    .map(|w| fmt::layer().with_writer(w).with_ansi(false).pretty()),
            )
            .with(
                writer
                    .filter(|_| file_format == Some(LogFormat::Compact))
                    .map(|w| fmt::layer().with_writer(w).with_ansi(false).compact()),
            )
            .init();

        guard
    }
}

/// Filter from `RUST_LOG` if set and valid, else the configured level, else `info`.
fn level_filter(env: Option<&str>, level: &str) -> EnvFilter {
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

fn file_appender(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    tracing_appender::rolling::daily(dir, prefix)
}
