//! Configuration types for structured logging.

use std::io;
use thiserror::Error;

/// Errors that can occur while configuring logging
#[derive(Error, Debug)]
pub enum LogError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Output format for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output with colors
    #[default]
    Pretty,

    /// Single-line output
    Compact,

    /// JSON output for log shippers
    Json,
}

impl LogFormat {
    /// Parse a format name into a [`LogFormat`]
    pub fn parse(s: &str) -> Result<Self, LogError> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LogError::InvalidFilter(format!(
                "unknown log format {s:?}, expected one of: pretty, compact, json"
            ))),
        }
    }
}

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// Write to standard error
    #[default]
    Stderr,

    /// Write to standard output
    Stdout,
}

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format
    pub format: LogFormat,

    /// Filter directive (e.g. "info", "regproxy_metrics=debug").
    /// If `None`, taken from the `RUST_LOG` environment variable.
    pub level: Option<String>,

    /// Whether to use ANSI colors (ignored by the JSON format)
    pub ansi: bool,

    /// Output destination
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Pretty,
            level: None,
            ansi: true,
            output: LogOutput::Stderr,
        }
    }
}

impl LogConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enable or disable ANSI colors
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Set the output destination
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Effective filter directive, falling back to `RUST_LOG` then "info"
    pub fn effective_filter(&self) -> String {
        self.level
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    }
}
