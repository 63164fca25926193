// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 RegProxy Contributors

//! Integration tests for the regproxy-metrics crate
//!
//! Exercises the public API: counter bank semantics under concurrency,
//! introspection tree registration, and Prometheus export format.

use regproxy_metrics::{
    register_proxy_vars, Encoder, ProxyMetrics, ProxyOperation, StatsSnapshot, TextEncoder,
    VarTree,
};
use regproxy_observability::{init_tracing, LogFormat};
use std::sync::{Arc, Once};
use std::thread;

fn init_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = init_tracing(LogFormat::Compact, Some("warn"));
    });
}

#[test]
fn test_bank_creation() {
    init_logs();
    let metrics = ProxyMetrics::new();
    assert!(metrics.is_ok(), "ProxyMetrics should create successfully");
}

#[test]
fn test_bank_default() {
    init_logs();
    let metrics = ProxyMetrics::default();
    assert_eq!(metrics.blob_stats(), StatsSnapshot::default());
}

#[test]
fn test_miss_then_serve_end_to_end() {
    init_logs();
    let metrics = ProxyMetrics::new().unwrap();

    metrics.record_blob_pull(50);
    metrics.record_blob_pull(25);
    metrics.record_blob_push(75);

    let blobs = metrics.blob_stats();
    assert_eq!(blobs.requests, 1);
    assert_eq!(blobs.hits, 1);
    assert_eq!(blobs.misses, 2);
    assert_eq!(blobs.bytes_pulled, 75);
    assert_eq!(blobs.bytes_pushed, 75);

    assert_eq!(metrics.manifest_stats(), StatsSnapshot::default());
}

#[test]
fn test_no_lost_updates_under_threads() {
    init_logs();
    let metrics = Arc::new(ProxyMetrics::new().unwrap());

    const THREADS: usize = 8;
    const PER_THREAD: u64 = 1_000;

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let bank = Arc::clone(&metrics);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    bank.record_blob_pull(3);
                    bank.record_blob_push(5);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected = THREADS as u64 * PER_THREAD;
    let blobs = metrics.blob_stats();
    assert_eq!(blobs.misses, expected);
    assert_eq!(blobs.requests, expected);
    assert_eq!(blobs.hits, expected);
    assert_eq!(blobs.bytes_pulled, expected * 3);
    assert_eq!(blobs.bytes_pushed, expected * 5);

    assert_eq!(metrics.operation_count(ProxyOperation::BlobPull), expected);
    assert_eq!(metrics.operation_count(ProxyOperation::BlobPush), expected);
}

#[test]
fn test_concurrent_manifest_pushes_sum_exactly() {
    init_logs();
    let metrics = Arc::new(ProxyMetrics::new().unwrap());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let bank = Arc::clone(&metrics);
            thread::spawn(move || {
                for _ in 0..100 {
                    bank.record_manifest_push(1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let manifests = metrics.manifest_stats();
    assert_eq!(manifests.requests, 1000);
    assert_eq!(manifests.hits, 1000);
    assert_eq!(manifests.bytes_pushed, 1000);
    assert_eq!(manifests.misses, 0);
    assert_eq!(manifests.bytes_pulled, 0);

    // Blob counters are untouched by manifest traffic
    assert_eq!(metrics.blob_stats(), StatsSnapshot::default());
}

#[test]
fn test_snapshot_reads_do_not_disturb_writers() {
    init_logs();
    let metrics = Arc::new(ProxyMetrics::new().unwrap());

    let writer = {
        let bank = Arc::clone(&metrics);
        thread::spawn(move || {
            for _ in 0..5_000 {
                bank.record_manifest_pull(2);
            }
        })
    };

    // Interleave snapshots with the writer; every observed value must be a
    // plausible intermediate state (monotone, never torn).
    let mut last = 0;
    while !writer.is_finished() {
        let seen = metrics.manifest_stats().misses;
        assert!(seen >= last);
        assert!(seen <= 5_000);
        last = seen;
    }
    writer.join().unwrap();

    assert_eq!(metrics.manifest_stats().misses, 5_000);
    assert_eq!(metrics.manifest_stats().bytes_pulled, 10_000);
}

#[test]
fn test_prometheus_export_format() {
    init_logs();
    let metrics = ProxyMetrics::new().unwrap();

    for bytes in [100u64, 200, 300] {
        metrics.record_blob_pull(bytes);
    }
    metrics.record_manifest_push(64);

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();

    let output = String::from_utf8(buffer).unwrap();
    assert!(output.contains("# TYPE registry_proxy_total counter"));
    assert!(output.contains("registry_proxy_total{type=\"BlobPull\"} 3"));
    assert!(output.contains("registry_proxy_total{type=\"ManifestPush\"} 1"));
}

#[test]
fn test_introspection_registration_is_idempotent() {
    init_logs();
    let tree = VarTree::new();
    let metrics = ProxyMetrics::new().unwrap();

    register_proxy_vars(&tree, &metrics);
    metrics.record_blob_push(2048);
    register_proxy_vars(&tree, &metrics);

    let blobs = tree.get(&["registry", "proxy", "blobs"]).unwrap();
    assert_eq!(blobs["Requests"], 1);
    assert_eq!(blobs["Hits"], 1);
    assert_eq!(blobs["BytesPushed"], 2048);
}

#[test]
fn test_global_tree_registration() {
    init_logs();
    let metrics = ProxyMetrics::new().unwrap();

    register_proxy_vars(VarTree::global(), &metrics);
    register_proxy_vars(VarTree::global(), &metrics);

    let rendered = VarTree::global().render();
    assert!(rendered["registry"]["proxy"]["blobs"].is_object());
    assert!(rendered["registry"]["proxy"]["manifests"].is_object());
}
