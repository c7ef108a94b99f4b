//! Pipeline orchestrator - coordinates source, factory, and dispatcher.

use std::future::Future;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::StreamsConfig;
use dispatcher::Dispatcher;
use sink_factory::SinkFactory;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::source::{feed_frames, EnvelopeInput};
use super::DispatchStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Resolved sink specs (config file + CLI)
    pub streams: StreamsConfig,

    /// Where serialized envelopes come from
    pub input: EnvelopeInput,

    /// Maximum number of envelopes to consume (None = unlimited)
    pub max_envelopes: Option<u64>,

    /// Channel buffer size between source and dispatcher
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<DispatchStats> {
        self.run_until(std::future::pending()).await
    }

    /// Run the pipeline until the feed is exhausted or `shutdown` resolves.
    ///
    /// A shutdown stops the source at the next frame boundary; the
    /// dispatcher drains what is already in flight and closes every sink
    /// before the stats are returned.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<DispatchStats> {
        let start_time = Instant::now();

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Build the sink registry; any bad spec or broker connection
        // failure aborts startup here, before an envelope is consumed.
        let registry = SinkFactory::build_registry(&self.config.streams)
            .await
            .context("Failed to initialize sinks")?;

        info!(sinks = registry.len(), "Sink registry initialized");

        let dispatcher = Dispatcher::new(registry);

        let (tx, rx) = mpsc::channel(self.config.buffer_size);
        let source = tokio::spawn(feed_frames(
            self.config.input.clone(),
            tx,
            self.config.max_envelopes,
            shutdown,
        ));

        let summary = dispatcher
            .run(rx)
            .await
            .context("Dispatch run aborted")?;

        let frames_fed = source
            .await
            .context("Envelope source task panicked")?
            .context("Envelope source failed")?;

        if frames_fed != summary.envelopes {
            warn!(
                frames_fed,
                envelopes = summary.envelopes,
                "Source and dispatcher counts differ"
            );
        }

        Ok(DispatchStats {
            envelopes: summary.envelopes,
            publishes: summary.publishes(),
            publish_failures: summary.failures(),
            duration: start_time.elapsed(),
            sinks: summary.sinks,
        })
    }
}
