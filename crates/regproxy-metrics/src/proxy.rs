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
//! Counter bank for proxy cache traffic
//!
//! One [`ProxyStats`] group per resource class (blobs, manifests), five
//! monotonic counters per group. All updates are independent atomic adds so
//! request handlers never contend on a lock.

use prometheus::{IntCounterVec, Opts, Registry};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

use crate::types::ProxyOperation;

/// Aggregate traffic counters for one resource class.
///
/// Every field is monotonically non-decreasing for the process lifetime and
/// wraps at `u64::MAX` rather than erroring. There is no ordering guarantee
/// between fields: a concurrent reader may observe `bytes_pulled` already
/// bumped while `misses` is not yet, or vice versa.
#[derive(Debug, Default)]
pub struct ProxyStats {
    requests: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    bytes_pulled: AtomicU64,
    bytes_pushed: AtomicU64,
}

impl ProxyStats {
    /// Copy the current counter values without taking any lock.
    ///
    /// Each field is loaded individually, so a snapshot taken while writers
    /// are active may mix values from slightly different instants; each field
    /// on its own is never torn.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bytes_pulled: self.bytes_pulled.load(Ordering::Relaxed),
            bytes_pushed: self.bytes_pushed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a [`ProxyStats`] group.
///
/// Serializes with the field names the debug endpoint has always exposed
/// (`Requests`, `Hits`, `Misses`, `BytesPulled`, `BytesPushed`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSnapshot {
    /// Client-facing operations served from the cache
    pub requests: u64,
    /// Requests satisfied without an upstream fetch
    pub hits: u64,
    /// Upstream fetches forced by a cache miss
    pub misses: u64,
    /// Cumulative bytes fetched from upstream
    pub bytes_pulled: u64,
    /// Cumulative bytes served to downstream clients
    pub bytes_pushed: u64,
}

/// Counter bank for the registry proxy cache.
///
/// Cheaply cloneable handle that can be shared across async tasks and
/// threads; all mutation operations are infallible, non-blocking, and safe
/// for unsynchronized concurrent use. Constructed once by the composition
/// root and passed to every request handler that records traffic.
#[derive(Clone)]
pub struct ProxyMetrics {
    inner: Arc<ProxyMetricsInner>,
}

struct ProxyMetricsInner {
    /// Prometheus registry holding the labeled operation counter
    registry: Registry,

    /// Per-operation event counter, label `type` in {BlobPull, BlobPush,
    /// ManifestPull, ManifestPush}
    operations: IntCounterVec,

    blobs: ProxyStats,
    manifests: ProxyStats,
}

impl ProxyMetrics {
    /// Create a new counter bank with a fresh Prometheus registry
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let operations = IntCounterVec::new(
            Opts::new("proxy_total", "The number of proxy requests made").namespace("registry"),
            &["type"],
        )?;
        registry.register(Box::new(operations.clone()))?;

        Ok(Self {
            inner: Arc::new(ProxyMetricsInner {
                registry,
                operations,
                blobs: ProxyStats::default(),
                manifests: ProxyStats::default(),
            }),
        })
    }

    /// Get reference to the Prometheus registry for gathering metrics
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Record a blob fetched from upstream into the cache (a miss)
    pub fn record_blob_pull(&self, bytes_pulled: u64) {
        trace!(bytes_pulled, "blob pull");
        self.inner.blobs.misses.fetch_add(1, Ordering::Relaxed);
        self.inner
            .blobs
            .bytes_pulled
            .fetch_add(bytes_pulled, Ordering::Relaxed);
        self.bump(ProxyOperation::BlobPull);
    }

    /// Record a blob served to a downstream client (a hit)
    pub fn record_blob_push(&self, bytes_pushed: u64) {
        trace!(bytes_pushed, "blob push");
        self.inner.blobs.requests.fetch_add(1, Ordering::Relaxed);
        self.inner.blobs.hits.fetch_add(1, Ordering::Relaxed);
        self.inner
            .blobs
            .bytes_pushed
            .fetch_add(bytes_pushed, Ordering::Relaxed);
        self.bump(ProxyOperation::BlobPush);
    }

    /// Record a manifest fetched from upstream into the cache (a miss)
    pub fn record_manifest_pull(&self, bytes_pulled: u64) {
        trace!(bytes_pulled, "manifest pull");
        self.inner.manifests.misses.fetch_add(1, Ordering::Relaxed);
        self.inner
            .manifests
            .bytes_pulled
            .fetch_add(bytes_pulled, Ordering::Relaxed);
        self.bump(ProxyOperation::ManifestPull);
    }

    /// Record a manifest served to a downstream client (a hit)
    pub fn record_manifest_push(&self, bytes_pushed: u64) {
        trace!(bytes_pushed, "manifest push");
        self.inner.manifests.requests.fetch_add(1, Ordering::Relaxed);
        self.inner.manifests.hits.fetch_add(1, Ordering::Relaxed);
        self.inner
            .manifests
            .bytes_pushed
            .fetch_add(bytes_pushed, Ordering::Relaxed);
        self.bump(ProxyOperation::ManifestPush);
    }

    /// Current blob counter values
    pub fn blob_stats(&self) -> StatsSnapshot {
        self.inner.blobs.snapshot()
    }

    /// Current manifest counter values
    pub fn manifest_stats(&self) -> StatsSnapshot {
        self.inner.manifests.snapshot()
    }

    /// How many times the given operation has been recorded
    pub fn operation_count(&self, op: ProxyOperation) -> u64 {
        self.inner.operations.with_label_values(&[op.as_label()]).get()
    }

    fn bump(&self, op: ProxyOperation) {
        self.inner.operations.with_label_values(&[op.as_label()]).inc();
    }
}

impl Default for ProxyMetrics {
    fn default() -> Self {
        // Registration into a fresh private registry cannot collide; a failure
        // here is a programming error in the metric declarations themselves.
        Self::new().expect("proxy metric registration failed")
    }
}
