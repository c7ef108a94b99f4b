//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::StreamerConfig;
use serde::Serialize;
use sink_factory::SinkFactory;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    logger_count: usize,
    broker_count: usize,
    input: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    let config = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => config,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            }
        }
    };

    // Dry-parse every sink spec through the factory grammar
    if let Err(e) = SinkFactory::check_specs(&config.streams) {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        };
    }

    let warnings = collect_warnings(&config);
    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ConfigSummary {
            logger_count: config.streams.loggers.len(),
            broker_count: config.streams.brokers.len(),
            input: config
                .source
                .input
                .as_ref()
                .map(|p| p.display().to_string()),
        }),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &StreamerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.streams.is_empty() {
        warnings.push("No sinks configured - envelopes will be decoded and discarded".to_string());
    }

    if config.source.input.is_none() {
        warnings.push("source.input not set - `run` will require --input".to_string());
    }

    for (i, spec) in config.streams.loggers.iter().enumerate() {
        if sink_factory::parse_logger_spec(spec).route_count() == 0 {
            warnings.push(format!(
                "Logger spec streams.loggers[{i}] has no route names - it will accept nothing"
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Loggers: {}", summary.logger_count);
            println!("  Brokers: {}", summary.broker_count);
            if let Some(ref input) = summary.input {
                println!("  Input: {}", input);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
