//! Dispatch metric recording helpers.
//!
//! Named counters/gauges exported through the Prometheus endpoint. Recording
//! is a no-op when no recorder is installed, so library crates may call these
//! unconditionally.

use metrics::{counter, gauge};

/// Record one inbound envelope accepted by the dispatcher
pub fn record_envelope_received(route: &str) {
    counter!("chainfeed_envelopes_total").increment(1);
    counter!("chainfeed_envelopes_by_route_total", "route" => route.to_string()).increment(1);
}

/// Record one publish attempt for a sink
pub fn record_publish(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "chainfeed_publishes_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a decode failure on the inbound path
pub fn record_decode_failure() {
    counter!("chainfeed_decode_failures_total").increment(1);
}

/// Record the size of the sink registry after initialization
pub fn record_sinks_registered(count: usize) {
    gauge!("chainfeed_sinks_registered").set(count as f64);
}
