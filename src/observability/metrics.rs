//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): gate outcomes by `outcome`
//! - `gate_upstream_requests_total` (counter): forwarded requests by `status`
//! - `gate_upstream_duration_seconds` (histogram): upstream latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record how the gate handled a request (`forwarded`, `bypassed`,
/// `preflight`, `out_of_scope`, or a rejection kind).
pub fn record_decision(outcome: &'static str) {
    counter!("gate_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream(status: u16, start: Instant) {
    counter!("gate_upstream_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gate_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
