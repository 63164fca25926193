// Copyright (C) 2026  RegProxy Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Tracing subscriber initialization.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Initialize tracing with the given format and optional filter directive.
///
/// Convenience wrapper around [`init_tracing_with_config`]. If `level` is
/// `None` the filter is taken from the `RUST_LOG` environment variable.
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(config)
}

/// Initialize the global tracing subscriber from a [`LogConfig`].
///
/// May only be called once per process; a second call returns an error from
/// the underlying subscriber installation.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let env_filter = build_env_filter(&config)?;
    let registry = Registry::default().with(env_filter);
    let writer = make_writer(config.output);

    match config.format {
        LogFormat::Pretty => {
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(config.ansi).pretty())
                .init();
        }
        LogFormat::Compact => {
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(config.ansi).compact())
                .init();
        }
        LogFormat::Json => {
            registry.with(fmt::layer().with_writer(writer).json()).init();
        }
    }

    Ok(())
}

fn make_writer(output: LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let directive = config.effective_filter();
    EnvFilter::try_new(&directive)
        .map_err(|e| LogError::InvalidFilter(format!("{directive:?}: {e}")))
}
