//! # Dispatcher
//!
//! Envelope decode-and-route fan-out.
//!
//! Responsibilities:
//! - decode each inbound buffer through the envelope codec
//! - iterate the sink registry in registration order
//! - publish to every sink whose route filter matches
//! - isolate per-sink publish failures from the rest of the fan-out

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;

pub use contracts::{Envelope, StreamSink};
pub use dispatcher::{DispatchSummary, Dispatcher, RegisteredSink};
pub use error::DispatchError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{BrokerChannel, BrokerSink, LogSink, TcpBrokerChannel};
