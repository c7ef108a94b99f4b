//! Configuration validation.
//!
//! Rules:
//! - no blank broker spec strings (a blank broker spec is always a typo)
//! - source input path, when set, must be non-empty
//!
//! A blank logger spec is legal: its route set is empty, so the sink is
//! created and accepts nothing. The `validate` CLI command warns about it.
//!
//! Spec grammar itself (broker URL shape, routing keys) is the factory's
//! responsibility; the `validate` CLI command dry-parses specs through it.

use contracts::{ConfigError, StreamerConfig};

/// Validate a StreamerConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &StreamerConfig) -> Result<(), ConfigError> {
    validate_specs(&config.streams.brokers, "streams.brokers")?;
    validate_source(config)?;
    Ok(())
}

fn validate_specs(specs: &[String], field: &str) -> Result<(), ConfigError> {
    for (i, spec) in specs.iter().enumerate() {
        if spec.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("{field}[{i}]"),
                "spec string is blank",
            ));
        }
    }
    Ok(())
}

fn validate_source(config: &StreamerConfig) -> Result<(), ConfigError> {
    if let Some(input) = &config.source.input {
        if input.as_os_str().is_empty() {
            return Err(ConfigError::invalid("source.input", "path is empty"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SourceConfig, StreamsConfig};

    fn config_with(loggers: Vec<&str>, brokers: Vec<&str>) -> StreamerConfig {
        StreamerConfig {
            source: SourceConfig::default(),
            streams: StreamsConfig {
                loggers: loggers.into_iter().map(String::from).collect(),
                brokers: brokers.into_iter().map(String::from).collect(),
            },
        }
    }

    #[test]
    fn test_empty_config_passes() {
        assert!(validate(&StreamerConfig::default()).is_ok());
    }

    #[test]
    fn test_blank_broker_spec_rejected() {
        let err = validate(&config_with(vec![], vec!["  "])).unwrap_err();
        assert!(err.to_string().contains("streams.brokers[0]"));
    }

    #[test]
    fn test_blank_logger_spec_is_valid() {
        // Empty route set: the sink exists and accepts nothing
        assert!(validate(&config_with(vec![""], vec![])).is_ok());
    }

    #[test]
    fn test_well_formed_specs_pass() {
        let config = config_with(vec!["transfer,swap"], vec!["u:p@h:1/q/k"]);
        assert!(validate(&config).is_ok());
    }
}
