//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::StreamerConfig;
use sink_factory::SinkFactory;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{EnvelopeInput, Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let mut config = load_config(args)?;

    // CLI specs append after the config file's specs of the same kind;
    // loggers still all precede brokers in the registry.
    config.streams.loggers.extend(args.stream_loggers.iter().cloned());
    config.streams.brokers.extend(args.stream_brokers.iter().cloned());

    info!(
        loggers = config.streams.loggers.len(),
        brokers = config.streams.brokers.len(),
        "Configuration resolved"
    );

    if config.streams.is_empty() {
        warn!("No sinks configured - every envelope will be decoded and discarded");
    }

    // Dry run - check the specs, print the plan, exit
    if args.dry_run {
        SinkFactory::check_specs(&config.streams).context("Sink spec check failed")?;
        info!("Dry run mode - configuration is valid, exiting");
        print_sink_plan(&config);
        return Ok(());
    }

    let input = resolve_input(args, &config)?;

    let pipeline_config = PipelineConfig {
        streams: config.streams,
        input,
        max_envelopes: if args.max_envelopes == 0 {
            None
        } else {
            Some(args.max_envelopes)
        },
        buffer_size: args.buffer_size,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let pipeline = Pipeline::new(pipeline_config);

    info!("Starting pipeline...");

    // Ctrl+C/SIGTERM stops the source at the next frame boundary; the
    // dispatcher drains in-flight envelopes and closes every sink before
    // the stats come back.
    let stats = pipeline
        .run_until(setup_shutdown_signal())
        .await
        .context("Pipeline execution failed")?;

    info!(
        envelopes = stats.envelopes,
        publishes = stats.publishes,
        publish_failures = stats.publish_failures,
        duration_secs = stats.duration.as_secs_f64(),
        eps = format!("{:.2}", stats.envelopes_per_sec()),
        "Pipeline completed successfully"
    );
    stats.print_summary();

    info!("chainfeed finished");
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<StreamerConfig> {
    match &args.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            info!(config = %path.display(), "Loading configuration");
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        // No file: configure entirely from CLI flags
        None => Ok(StreamerConfig::default()),
    }
}

fn resolve_input(args: &RunArgs, config: &StreamerConfig) -> Result<EnvelopeInput> {
    let path = args
        .input
        .clone()
        .or_else(|| config.source.input.clone())
        .context("No envelope input given (use --input or set source.input)")?;

    if path.as_os_str() == "-" {
        Ok(EnvelopeInput::Stdin)
    } else {
        Ok(EnvelopeInput::File(path))
    }
}

fn print_sink_plan(config: &StreamerConfig) {
    match SinkFactory::plan(&config.streams) {
        Ok(plan) => {
            println!("Sink plan ({} sinks, registration order):", plan.len());
            for sink in plan {
                match sink.destination {
                    Some(dest) => {
                        println!("  {} [{}] routes={} -> {}", sink.name, sink.kind, sink.routes, dest)
                    }
                    None => println!("  {} [{}] routes={}", sink.name, sink.kind, sink.routes),
                }
            }
        }
        Err(e) => println!("Sink plan unavailable: {e}"),
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
