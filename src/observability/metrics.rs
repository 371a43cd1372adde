//! Metrics collection and exposition.
//!
//! # Metrics
//! - `validator_validations_total` (counter): evaluated requests by outcome
//! - `validator_validation_duration_seconds` (histogram): per-request evaluation time
//! - `validator_reloads_total` (counter): table reloads by result
//! - `validator_table_rows` (gauge): rows per reference table
//! - `validator_http_requests_total` (counter): API calls by route and status
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::tables::TableStats;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_validation(valid: bool, start: Instant) {
    let outcome = if valid { "valid" } else { "invalid" };
    metrics::counter!("validator_validations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("validator_validation_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_reload(result: &'static str) {
    metrics::counter!("validator_reloads_total", "result" => result).increment(1);
}

pub fn record_table_sizes(stats: &TableStats) {
    let rows = [
        ("requests", stats.requests),
        ("credits", stats.credits),
        ("suppliers", stats.suppliers),
        ("quality_officers", stats.quality_officers),
        ("blacklist", stats.blacklist_entries),
    ];
    for (table, count) in rows {
        metrics::gauge!("validator_table_rows", "table" => table).set(count as f64);
    }
}

pub fn record_request(route: String, status: u16) {
    metrics::counter!(
        "validator_http_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
