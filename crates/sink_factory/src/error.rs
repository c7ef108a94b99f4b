//! Sink Factory error types

use contracts::ConfigError;
use thiserror::Error;

/// Sink Factory specific error
#[derive(Debug, Error)]
pub enum FactoryError {
    /// A spec string failed to parse
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A broker sink failed to connect during initialization
    #[error("failed to connect broker sink '{name}' at {address}: {message}")]
    BrokerConnection {
        name: String,
        address: String,
        message: String,
    },
}

impl FactoryError {
    /// Create a broker connection error
    pub fn broker_connection(
        name: impl Into<String>,
        address: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BrokerConnection {
            name: name.into(),
            address: address.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, FactoryError>;
