//! StreamSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for sinks. The registry holds sinks as
//! trait objects, so the trait must stay dyn-compatible (`async_trait`).

use async_trait::async_trait;

use crate::{PublishError, RouteFilter};

/// Stream output trait
///
/// All sink variants (logger, broker, ...) implement this trait. New kinds
/// extend the set without touching the dispatcher's fan-out loop.
#[async_trait]
pub trait StreamSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// The sink's configured route set
    fn routes(&self) -> &RouteFilter;

    /// Deterministic, pure predicate over the configured route set
    fn matches_route(&self, route: &str) -> bool {
        self.routes().matches(route)
    }

    /// Deliver one payload to the backing destination, best-effort.
    ///
    /// `route` is the envelope's route identifier (the effective routing key
    /// for broker sinks). May perform blocking network I/O.
    ///
    /// # Errors
    /// Returns a `PublishError` that the dispatcher logs and swallows; it
    /// must not prevent delivery to subsequently registered sinks.
    async fn publish(&mut self, route: &str, payload: &[u8]) -> Result<(), PublishError>;

    /// Release resources at shutdown
    async fn close(&mut self) -> Result<(), PublishError>;
}
