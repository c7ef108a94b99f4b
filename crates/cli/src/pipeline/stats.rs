//! Pipeline statistics.

use std::time::Duration;

use dispatcher::MetricsSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    /// Envelopes decoded and fanned out
    pub envelopes: u64,

    /// Successful publishes across all sinks
    pub publishes: u64,

    /// Failed publishes (swallowed per sink)
    pub publish_failures: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Per-sink counters, in registration order
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl DispatchStats {
    /// Envelope throughput
    pub fn envelopes_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.envelopes as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Dispatch Summary ===");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Envelopes: {}", self.envelopes);
        println!("Publishes: {}", self.publishes);
        println!("Publish failures: {}", self.publish_failures);
        println!("Throughput: {:.2} envelopes/s", self.envelopes_per_sec());

        if !self.sinks.is_empty() {
            println!("Sinks:");
            for (name, metrics) in &self.sinks {
                println!(
                    "  {}: matched={} published={} failed={}",
                    name, metrics.matched_count, metrics.publish_count, metrics.failure_count
                );
            }
        }
        println!();
    }
}
