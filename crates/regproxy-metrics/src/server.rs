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
//! HTTP exposure for proxy metrics
//!
//! Axum-based server with a `/metrics` endpoint in Prometheus text exposition
//! format and a `/debug/vars` endpoint rendering the process-wide
//! introspection tree as JSON.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::{types::MetricsConfig, vars::VarTree, ProxyMetrics};

/// HTTP server exposing the proxy counter bank.
///
/// Readers scrape `/metrics` or `/debug/vars` on demand; neither endpoint
/// takes a lock shared with the request path, so scraping never stalls
/// writers.
#[derive(Clone)]
pub struct MetricsServer {
    metrics: ProxyMetrics,
    config: MetricsConfig,
}

impl MetricsServer {
    /// Create a new metrics server bound to 127.0.0.1 on the given port
    pub fn new(metrics: ProxyMetrics, port: u16) -> Self {
        Self {
            metrics,
            config: MetricsConfig::with_port(port),
        }
    }

    /// Create a new metrics server with custom configuration
    pub fn with_config(metrics: ProxyMetrics, config: MetricsConfig) -> Self {
        Self { metrics, config }
    }

    /// Get the bind address for the server
    pub fn bind_address(&self) -> String {
        self.config.socket_addr()
    }

    /// Run the server until the process exits.
    ///
    /// Returns immediately when the endpoint is disabled in the config.
    /// Typically spawned as a background task:
    ///
    /// ```ignore
    /// let server = MetricsServer::new(metrics, 9090);
    /// tokio::spawn(async move { server.serve().await });
    /// ```
    pub async fn serve(self) -> anyhow::Result<()> {
        if !self.config.enabled {
            info!("metrics server disabled");
            return Ok(());
        }

        let addr = self.config.socket_addr();
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/debug/vars", get(vars_handler))
            .route("/health", get(health_handler))
            .with_state(self.metrics);

        let listener = TcpListener::bind(&addr).await?;
        info!("metrics server listening on {}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("metrics server error: {}", e))
    }
}

/// Handler for `/metrics`: Prometheus text exposition format
async fn metrics_handler(State(metrics): State<ProxyMetrics>) -> Response {
    let metric_families = metrics.registry().gather();

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => {
            debug!("encoded {} metric families", metric_families.len());
            (
                StatusCode::OK,
                [("content-type", encoder.format_type())],
                buffer,
            )
                .into_response()
        }
        Err(e) => {
            error!("failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Handler for `/debug/vars`: JSON render of the global introspection tree
async fn vars_handler() -> impl IntoResponse {
    Json(VarTree::global().render())
}

/// Handler for `/health`
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
