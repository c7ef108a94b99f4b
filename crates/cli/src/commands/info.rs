//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use sink_factory::{SinkFactory, SinkPlan};
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<String>,
    sinks: Vec<SinkPlan>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let plan = SinkFactory::plan(&config.streams).context("Failed to resolve sink plan")?;
    let config_info = ConfigInfo {
        input: config
            .source
            .input
            .as_ref()
            .map(|p| p.display().to_string()),
        sinks: plan,
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&config_info).context("Failed to serialize info")?
        );
    } else {
        print_info(&args.config.display().to_string(), &config_info);
    }

    Ok(())
}

fn print_info(config_path: &str, info: &ConfigInfo) {
    println!("Configuration: {}", config_path);
    match &info.input {
        Some(input) => println!("  Input: {}", input),
        None => println!("  Input: (from --input at run time)"),
    }

    println!("  Sinks ({}, registration order):", info.sinks.len());
    for sink in &info.sinks {
        match &sink.destination {
            Some(dest) => println!(
                "    {} [{}] routes={} -> {}",
                sink.name, sink.kind, sink.routes, dest
            ),
            None => println!("    {} [{}] routes={}", sink.name, sink.kind, sink.routes),
        }
    }
}
