//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Chainfeed - envelope decode-and-route streamer
#[derive(Parser, Debug)]
#[command(
    name = "chainfeed",
    author,
    version,
    about = "Chain-data envelope streamer",
    long_about = "Consumes a feed of versioned binary envelopes, decodes each one, and \n\
                  fans it out to the configured sinks (structured logger, message \n\
                  broker) whose route sets match the envelope's route."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CHAINFEED_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CHAINFEED_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the envelope streamer pipeline
    Run(RunArgs),

    /// Validate configuration and sink specs without running
    Validate(ValidateArgs),

    /// Display the resolved sink plan
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); omit to configure
    /// entirely from the CLI flags below
    #[arg(short, long, env = "CHAINFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Envelope input: path to a length-framed envelope stream, or "-" for
    /// stdin. Overrides source.input from the configuration file.
    #[arg(short, long, env = "CHAINFEED_INPUT")]
    pub input: Option<PathBuf>,

    /// Logger stream spec: comma-separated accepted route names.
    /// Repeatable; appended after the config file's logger specs.
    #[arg(long = "stream-logger", value_name = "ROUTES")]
    pub stream_loggers: Vec<String>,

    /// Broker stream spec: USER:PASSWORD@HOST:PORT/QUEUE[/KEY,KEY,...].
    /// Repeatable; appended after the config file's broker specs.
    #[arg(long = "stream-broker", value_name = "SPEC")]
    pub stream_brokers: Vec<String>,

    /// Maximum number of envelopes to consume (0 = unlimited)
    #[arg(long, default_value = "0", env = "CHAINFEED_MAX_ENVELOPES")]
    pub max_envelopes: u64,

    /// Channel buffer size for the inbound envelope queue
    #[arg(long, default_value = "100", env = "CHAINFEED_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "CHAINFEED_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and print the sink plan without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "chainfeed.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "chainfeed.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
