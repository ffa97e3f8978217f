use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created (status WAITING).
pub const BOOKINGS_CREATED_TOTAL: &str = "lendable_bookings_created_total";

/// Counter: approve/reject decisions. Labels: outcome.
pub const BOOKING_DECISIONS_TOTAL: &str = "lendable_booking_decisions_total";

/// Histogram: listing query latency in seconds. Labels: op.
pub const LIST_QUERY_DURATION_SECONDS: &str = "lendable_list_query_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Decision outcome label for metrics and logs.
pub fn decision_label(approve: bool) -> &'static str {
    if approve { "approved" } else { "rejected" }
}
