//! Common types for proxy metrics collection

use serde::{Deserialize, Serialize};

/// Configuration for the metrics server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Port for the metrics HTTP server
    pub port: u16,

    /// Enable the metrics endpoint
    pub enabled: bool,

    /// Bind address (default: 127.0.0.1)
    pub bind_address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            enabled: false,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create new config with port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            enabled: true,
            ..Default::default()
        }
    }

    /// Get bind address with port
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Proxy operation types for labeling the `registry_proxy_total` counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyOperation {
    /// A blob was fetched from the upstream registry into the cache
    BlobPull,
    /// A blob was served to a downstream client
    BlobPush,
    /// A manifest was fetched from the upstream registry into the cache
    ManifestPull,
    /// A manifest was served to a downstream client
    ManifestPush,
}

impl ProxyOperation {
    /// All operation types, in exposition order
    pub const ALL: [ProxyOperation; 4] = [
        ProxyOperation::BlobPull,
        ProxyOperation::BlobPush,
        ProxyOperation::ManifestPull,
        ProxyOperation::ManifestPush,
    ];

    /// Get string label for Prometheus
    pub fn as_label(&self) -> &'static str {
        match self {
            ProxyOperation::BlobPull => "BlobPull",
            ProxyOperation::BlobPush => "BlobPush",
            ProxyOperation::ManifestPull => "ManifestPull",
            ProxyOperation::ManifestPush => "ManifestPush",
        }
    }
}
