//! Per-sink counters for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single registered sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Envelopes whose route matched this sink
    matched_count: AtomicU64,
    /// Successful publishes
    publish_count: AtomicU64,
    /// Failed publishes (swallowed at the dispatcher boundary)
    failure_count: AtomicU64,
}

impl SinkMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Matched-envelope count
    pub fn matched_count(&self) -> u64 {
        self.matched_count.load(Ordering::Relaxed)
    }

    /// Increment matched-envelope count
    pub fn inc_matched_count(&self) {
        self.matched_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Successful publish count
    pub fn publish_count(&self) -> u64 {
        self.publish_count.load(Ordering::Relaxed)
    }

    /// Increment successful publish count
    pub fn inc_publish_count(&self) {
        self.publish_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Failed publish count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failed publish count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            matched_count: self.matched_count(),
            publish_count: self.publish_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of sink counters (for reporting)
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub matched_count: u64,
    pub publish_count: u64,
    pub failure_count: u64,
}
