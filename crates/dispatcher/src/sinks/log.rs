//! LogSink - emits matched envelopes through tracing

use async_trait::async_trait;
use contracts::{PublishError, RouteFilter, StreamSink};
use tracing::{info, instrument};

/// How many payload bytes the preview shows
const PREVIEW_LEN: usize = 16;

/// Sink that logs route and payload for every matched envelope.
///
/// Accepts exactly the routes it was configured with; an empty route list
/// means it accepts nothing.
pub struct LogSink {
    name: String,
    routes: RouteFilter,
}

impl LogSink {
    /// Create a LogSink accepting the given route names
    pub fn new<I, S>(name: impl Into<String>, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            routes: RouteFilter::named(routes),
        }
    }

    /// Create a LogSink over an already-built route filter
    pub fn with_filter(name: impl Into<String>, routes: RouteFilter) -> Self {
        Self {
            name: name.into(),
            routes,
        }
    }

    fn payload_preview(payload: &[u8]) -> String {
        let shown = &payload[..payload.len().min(PREVIEW_LEN)];
        let mut preview = String::with_capacity(shown.len() * 2 + 2);
        for byte in shown {
            preview.push_str(&format!("{byte:02x}"));
        }
        if payload.len() > PREVIEW_LEN {
            preview.push_str("..");
        }
        preview
    }
}

#[async_trait]
impl StreamSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn routes(&self) -> &RouteFilter {
        &self.routes
    }

    #[instrument(
        name = "log_sink_publish",
        skip(self, payload),
        fields(sink = %self.name, route = %route)
    )]
    async fn publish(&mut self, route: &str, payload: &[u8]) -> Result<(), PublishError> {
        info!(
            sink = %self.name,
            route = %route,
            payload_len = payload.len(),
            payload = %Self::payload_preview(payload),
            "Envelope published"
        );
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PublishError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
