//! Layered error definitions
//!
//! Categorized by source: codec / config / sink

use thiserror::Error;

/// Envelope codec error.
///
/// Decoding is total: every input yields either a valid `Envelope` or one of
/// these variants. A decode failure on the inbound path indicates a protocol
/// mismatch with the trusted producer and is escalated at the dispatcher
/// boundary rather than recovered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Leading version discriminant does not select a known variant
    #[error("unknown envelope version: {0}")]
    UnknownVersion(u32),

    /// Buffer truncated or malformed at some field
    #[error("malformed envelope: {message}")]
    MalformedEnvelope { message: String },
}

impl DecodeError {
    /// Create a malformed-envelope error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            message: message.into(),
        }
    }
}

/// Sink configuration error, fatal at initialization time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A textual sink spec does not match its kind's grammar
    #[error("malformed sink spec '{spec}': {message}")]
    MalformedSpec { spec: String, message: String },

    /// Config file level problem (missing field, bad value)
    #[error("config error at '{field}': {message}")]
    Invalid { field: String, message: String },

    /// Config file parse error
    #[error("config parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error while reading a config file
    #[error("io error: {0}")]
    Io(String),
}

impl ConfigError {
    /// Create a malformed-spec error naming the offending spec
    pub fn malformed_spec(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSpec {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Create a field-level validation error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a parse error without a source
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        use ConfigError::*;
        match (self, other) {
            (
                MalformedSpec { spec: a, message: b },
                MalformedSpec { spec: c, message: d },
            ) => a == c && b == d,
            (Invalid { field: a, message: b }, Invalid { field: c, message: d }) => {
                a == c && b == d
            }
            (Parse { message: a, .. }, Parse { message: b, .. }) => a == b,
            (Io(a), Io(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Sink publish error, recovered locally at the dispatcher boundary.
///
/// A failed publish is logged and counted; it never prevents delivery to the
/// remaining sinks in the same fan-out pass.
#[derive(Debug, Error)]
#[error("sink '{sink_name}' publish error: {message}")]
pub struct PublishError {
    /// Name of the failing sink
    pub sink_name: String,
    /// Human-readable cause
    pub message: String,
}

impl PublishError {
    /// Create a publish error for the named sink
    pub fn new(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::UnknownVersion(7).to_string(),
            "unknown envelope version: 7"
        );
        assert_eq!(
            DecodeError::malformed("truncated route").to_string(),
            "malformed envelope: truncated route"
        );
    }

    #[test]
    fn test_config_error_names_offending_spec() {
        let err = ConfigError::malformed_spec("user@host", "missing password");
        let text = err.to_string();
        assert!(text.contains("user@host"));
        assert!(text.contains("missing password"));
    }

    #[test]
    fn test_publish_error_display() {
        let err = PublishError::new("broker-q1", "connection reset");
        assert_eq!(
            err.to_string(),
            "sink 'broker-q1' publish error: connection reset"
        );
    }
}
