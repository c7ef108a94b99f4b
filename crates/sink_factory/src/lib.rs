//! # Sink Factory
//!
//! Builds the sink registry from textual configuration specs.
//!
//! Responsibilities:
//! - parse logger and broker spec grammars
//! - construct concrete sinks (loggers first, then brokers, declaration order)
//! - fail fast: one malformed spec aborts the whole initialization

mod error;
mod factory;
mod spec;

pub use error::{FactoryError, Result};
pub use factory::{SinkFactory, SinkPlan};
pub use spec::{parse_broker_spec, parse_logger_spec, BrokerSpec};
