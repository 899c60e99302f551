//! Metrics collection and exposition.
//!
//! Prometheus-compatible counters and histograms, exported on a
//! separate listener when enabled:
//! - `gateway_requests_total{method, path, status}`
//! - `gateway_request_duration_seconds{path}`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Record one request observation. Cheap when no recorder is installed.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "path" => path.to_string())
        .record(start.elapsed().as_secs_f64());
}
