//! RegProxy Observability Module
//!
//! Structured logging and tracing setup shared by the RegProxy crates.
//!
//! # Features
//!
//! - **Multiple Output Formats**: Pretty, compact, and JSON output
//! - **Environment-based Filtering**: Log level control via `RUST_LOG`
//! - **Structured Logging**: JSON output for machine-readable logs
//!
//! # Example
//!
//! ```ignore
//! use regproxy_observability::{init_tracing, LogFormat};
//!
//! fn main() {
//!     init_tracing(LogFormat::Pretty, Some("info")).unwrap();
//!     tracing::info!("proxy starting");
//! }
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config};

/// Tracing re-exports for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level};
