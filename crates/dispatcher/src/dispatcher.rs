//! Dispatcher - decode each inbound buffer and fan out to matching sinks

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use contracts::{DecodeError, Envelope, StreamSink};

use crate::error::DispatchError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// One sink in the registry, paired with its counters
pub struct RegisteredSink {
    sink: Box<dyn StreamSink>,
    metrics: Arc<SinkMetrics>,
}

impl RegisteredSink {
    /// Wrap a sink with fresh counters
    pub fn new(sink: Box<dyn StreamSink>) -> Self {
        Self {
            sink,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Sink name
    pub fn name(&self) -> &str {
        self.sink.name()
    }

    /// Shared counters for this sink
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }
}

/// Totals from a completed dispatch run
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    /// Envelopes decoded and fanned out
    pub envelopes: u64,
    /// Per-sink counter snapshots, in registration order
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl DispatchSummary {
    /// Total successful publishes across all sinks
    pub fn publishes(&self) -> u64 {
        self.sinks.iter().map(|(_, m)| m.publish_count).sum()
    }

    /// Total failed publishes across all sinks
    pub fn failures(&self) -> u64 {
        self.sinks.iter().map(|(_, m)| m.failure_count).sum()
    }
}

/// Fans one decoded envelope out to every matching sink.
///
/// Owns the sink registry; the registry is append-only before construction
/// and read-only afterwards. Stateless across calls beyond the registry:
/// each dispatch is independent, FIFO over the inbound sequence.
pub struct Dispatcher {
    sinks: Vec<RegisteredSink>,
}

impl Dispatcher {
    /// Create a dispatcher over an initialized registry.
    ///
    /// Fan-out iteration order equals the order of `sinks`.
    pub fn new(sinks: Vec<Box<dyn StreamSink>>) -> Self {
        let sinks = sinks.into_iter().map(RegisteredSink::new).collect();
        Self { sinks }
    }

    /// Create a dispatcher from pre-wrapped registry entries (for testing)
    pub fn with_registered(sinks: Vec<RegisteredSink>) -> Self {
        Self { sinks }
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Counter snapshots for all sinks, in registration order
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.sinks
            .iter()
            .map(|s| (s.name().to_string(), s.metrics.snapshot()))
            .collect()
    }

    /// Decode one serialized envelope and fan it out.
    ///
    /// A decode failure is returned to the caller (protocol violation from
    /// the trusted producer); per-sink publish failures are logged, counted,
    /// and swallowed so that later sinks still receive the envelope.
    pub async fn dispatch(&mut self, buf: &[u8]) -> Result<(), DecodeError> {
        let envelope = match codec::decode(buf) {
            Ok(envelope) => envelope,
            Err(e) => {
                observability::record_decode_failure();
                return Err(e);
            }
        };

        observability::record_envelope_received(envelope.route());
        self.fan_out(&envelope).await;
        Ok(())
    }

    /// Sequential fan-out in registration order; deterministic side-effect
    /// ordering, no publish ever raises out of the loop.
    async fn fan_out(&mut self, envelope: &Envelope) {
        let route = envelope.route();
        let payload = envelope.payload();

        for entry in &mut self.sinks {
            if !entry.sink.matches_route(route) {
                continue;
            }
            entry.metrics.inc_matched_count();

            match entry.sink.publish(route, payload).await {
                Ok(()) => {
                    entry.metrics.inc_publish_count();
                    observability::record_publish(entry.sink.name(), true);
                }
                Err(e) => {
                    entry.metrics.inc_failure_count();
                    observability::record_publish(entry.sink.name(), false);
                    error!(
                        sink = %entry.sink.name(),
                        route = %route,
                        error = %e,
                        "Publish failed"
                    );
                }
            }
        }
    }

    /// Consume serialized envelopes from `rx` until the channel closes.
    ///
    /// FIFO, single consumer, one fan-out per buffer. A decode failure is
    /// fatal to the run: sinks are closed and the error is surfaced to the
    /// host, which decides whether to crash.
    #[instrument(name = "dispatcher_run", skip(self, rx))]
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<Bytes>,
    ) -> Result<DispatchSummary, DispatchError> {
        info!(sinks = self.sinks.len(), "Dispatcher started");

        let mut envelopes: u64 = 0;

        while let Some(buf) = rx.recv().await {
            if let Err(e) = self.dispatch(&buf).await {
                error!(envelopes, error = %e, "Decode failed, aborting dispatch run");
                Self::close_sinks(&mut self.sinks).await;
                return Err(DispatchError::decode(envelopes, e));
            }
            envelopes += 1;

            if envelopes.is_multiple_of(1000) {
                debug!(envelopes, "Dispatcher progress");
            }
        }

        info!(envelopes, "Dispatcher input closed, shutting down");

        let summary = DispatchSummary {
            envelopes,
            sinks: self.metrics(),
        };
        Self::close_sinks(&mut self.sinks).await;

        info!("Dispatcher shutdown complete");
        Ok(summary)
    }

    async fn close_sinks(sinks: &mut [RegisteredSink]) {
        for entry in sinks {
            if let Err(e) = entry.sink.close().await {
                error!(sink = %entry.sink.name(), error = %e, "Close failed on shutdown");
            }
        }
    }
}
