//! RegProxy Metrics Module
//!
//! Counter aggregation and exposure for the registry proxy cache. Tracks, per
//! resource class (blobs and manifests), requests served, cache hits and
//! misses, and bytes transferred in each direction.
//!
//! # Features
//!
//! - **Lock-free Counters**: atomic per-field increments, safe under any
//!   degree of concurrency with no contention stalls
//! - **Prometheus Integration**: a labeled `registry_proxy_total` counter and
//!   text exposition via a `/metrics` endpoint
//! - **Introspection Tree**: expvar-style, lazily-evaluated debug variables
//!   published under `registry.proxy.{blobs,manifests}`
//! - **Low Overhead**: recording an event is a handful of atomic adds
//!
//! # Example
//!
//! ```ignore
//! use regproxy_metrics::{register_proxy_vars, MetricsServer, ProxyMetrics, VarTree};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let metrics = ProxyMetrics::new()?;
//!     register_proxy_vars(VarTree::global(), &metrics);
//!
//!     let server = MetricsServer::new(metrics.clone(), 9090);
//!     tokio::spawn(async move { server.serve().await });
//!
//!     // Record proxy traffic from request handlers
//!     metrics.record_blob_pull(1024);
//!     metrics.record_blob_push(1024);
//!
//!     Ok(())
//! }
//! ```

pub mod proxy;
pub mod server;
pub mod types;
pub mod vars;

pub use proxy::{ProxyMetrics, ProxyStats, StatsSnapshot};
pub use server::MetricsServer;
pub use types::{MetricsConfig, ProxyOperation};
pub use vars::{register_proxy_vars, VarTree};

// Re-export prometheus types for convenience
pub use prometheus::{Encoder, TextEncoder};
