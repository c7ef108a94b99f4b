//! Dispatch Demo
//!
//! Demonstrates the in-memory pipeline: encode envelopes, feed them through
//! the channel the dispatcher consumes from, and fan out to logger sinks.
//! Runs without any broker endpoint.
//!
//! Run with: cargo run --bin dispatch_demo

use bytes::Bytes;
use contracts::{Envelope, StreamsConfig};
use dispatcher::Dispatcher;
use sink_factory::SinkFactory;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Dispatch Demo");

    // ==== Stage 1: Use default specs or load from a config file ====
    let streams = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading streams config");
        config_loader::ConfigLoader::load_from_path(std::path::Path::new(&path))?.streams
    } else {
        StreamsConfig {
            loggers: vec!["transfer,swap".to_string(), "other".to_string()],
            brokers: vec![],
        }
    };

    let registry = SinkFactory::build_registry(&streams).await?;
    tracing::info!(sinks = registry.len(), "Sink registry built");

    // ==== Stage 2: Produce a few envelopes ====
    let (tx, rx) = mpsc::channel::<Bytes>(16);
    let producer = tokio::spawn(async move {
        for (route, payload) in [
            ("transfer", &b"alice->bob:10"[..]),
            ("swap", b"eth/usd"),
            ("other", b"ignored by the named logger"),
        ] {
            let envelope = Envelope::v0(route, payload.to_vec());
            let bytes = Bytes::from(codec::encode(&envelope));
            if tx.send(bytes).await.is_err() {
                break;
            }
        }
    });

    // ==== Stage 3: Run the dispatcher to completion ====
    let dispatcher = Dispatcher::new(registry);
    let summary = dispatcher.run(rx).await?;
    producer.await?;

    tracing::info!(
        envelopes = summary.envelopes,
        publishes = summary.publishes(),
        failures = summary.failures(),
        "Demo complete"
    );
    for (name, metrics) in &summary.sinks {
        tracing::info!(
            sink = %name,
            matched = metrics.matched_count,
            published = metrics.publish_count,
            "Sink totals"
        );
    }

    Ok(())
}
