//! StreamerConfig - declarative configuration for the streamer pipeline.
//!
//! The sink specs stay textual here; `sink_factory` parses them into concrete
//! sinks. Order matters: loggers are registered before brokers, each kind in
//! declaration order.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level streamer configuration (TOML/JSON)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamerConfig {
    /// Envelope source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Output sink specs
    #[serde(default)]
    pub streams: StreamsConfig,
}

/// Where the inbound envelope feed comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to a length-framed envelope stream; "-" means stdin.
    /// The CLI `--input` flag overrides this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
}

/// Ordered textual sink specs, one sink per entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamsConfig {
    /// Logger specs; each is a comma-separated list of accepted route names
    #[serde(default)]
    pub loggers: Vec<String>,

    /// Broker specs; each is `USER:PASSWORD@HOST:PORT/QUEUE[/KEY,KEY,...]`
    #[serde(default)]
    pub brokers: Vec<String>,
}

impl StreamsConfig {
    /// Total number of sinks this configuration declares
    pub fn sink_count(&self) -> usize {
        self.loggers.len() + self.brokers.len()
    }

    /// True when no sinks are declared (dispatch becomes a no-op)
    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty() && self.brokers.is_empty()
    }
}
