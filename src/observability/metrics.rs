//! Metrics collection and exposition.
//!
//! # Metrics
//! - `letters_requests_total` (counter): requests by endpoint, status
//! - `letters_request_duration_seconds` (histogram): latency by endpoint
//! - `letters_matches` (histogram): countries returned per query
//! - `letters_registry_countries` (gauge): size of the loaded registry
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "letters_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("letters_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record how many countries a query matched.
pub fn record_matches(count: usize) {
    histogram!("letters_matches").record(count as f64);
}

/// Record the size of the loaded registry.
pub fn record_registry_size(count: usize) {
    gauge!("letters_registry_countries").set(count as f64);
}
