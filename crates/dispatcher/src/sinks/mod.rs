//! Sink implementations
//!
//! Contains LogSink and BrokerSink plus the broker transport abstraction.

mod broker;
mod log;

pub use self::broker::{BrokerChannel, BrokerSink, TcpBrokerChannel};
pub use self::log::LogSink;
