//! Metrics collection and exposition.
//!
//! # Metrics
//! - `notes_requests_total` (counter): requests by method, status
//! - `notes_request_duration_seconds` (histogram): latency distribution
//! - `notes_created_total` (counter): starter notes written
//! - `notes_updated_total` (counter): successful saves
//! - `notes_conflicts_total` (counter): saves rejected for a stale version
//! - `notes_rate_limited_total` (counter): requests answered with 429
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "notes_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("notes_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_note_created() {
    metrics::counter!("notes_created_total").increment(1);
}

pub fn record_note_updated() {
    metrics::counter!("notes_updated_total").increment(1);
}

pub fn record_conflict() {
    metrics::counter!("notes_conflicts_total").increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("notes_rate_limited_total").increment(1);
}

/// Middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
