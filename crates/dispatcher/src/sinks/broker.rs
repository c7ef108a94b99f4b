//! BrokerSink - forwards matched envelopes to a message-broker queue
//!
//! The sink owns a persistent connection for its whole lifetime; connection
//! management lives behind the `BrokerChannel` trait so transports can be
//! swapped (and mocked in tests). The shipped transport speaks a
//! length-framed bincode protocol over TCP: an auth frame at connect, then
//! one publish frame per matched envelope.

use async_trait::async_trait;
use contracts::{PublishError, RouteFilter, StreamSink};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument};

/// Frames understood by the broker endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) enum BrokerFrame {
    /// Sent once, immediately after connecting
    Auth { user: String, password: String },
    /// One matched envelope; `routing_key` is the envelope's route
    Publish {
        queue: String,
        routing_key: String,
        payload: Vec<u8>,
    },
}

/// Broker transport abstraction.
///
/// Errors are transport-level; `BrokerSink` maps them into `PublishError`
/// under its own name.
#[async_trait]
pub trait BrokerChannel: Send {
    /// Deliver one payload to `queue` under `routing_key`
    async fn send(
        &mut self,
        queue: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> std::io::Result<()>;

    /// Tear down the connection
    async fn shutdown(&mut self) -> std::io::Result<()>;
}

/// TCP transport: `[len: u32 LE][bincode(BrokerFrame)]` per frame
pub struct TcpBrokerChannel {
    stream: TcpStream,
}

impl TcpBrokerChannel {
    /// Connect and authenticate
    #[instrument(name = "broker_channel_connect", skip(user, password))]
    pub async fn connect(address: &str, user: &str, password: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let mut channel = Self { stream };
        channel
            .write_frame(&BrokerFrame::Auth {
                user: user.to_string(),
                password: password.to_string(),
            })
            .await?;

        debug!(address = %address, "BrokerChannel connected");
        Ok(channel)
    }

    async fn write_frame(&mut self, frame: &BrokerFrame) -> std::io::Result<()> {
        let body = bincode::serialize(frame)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.stream
            .write_all(&(body.len() as u32).to_le_bytes())
            .await?;
        self.stream.write_all(&body).await?;
        self.stream.flush().await
    }
}

#[async_trait]
impl BrokerChannel for TcpBrokerChannel {
    async fn send(
        &mut self,
        queue: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> std::io::Result<()> {
        self.write_frame(&BrokerFrame::Publish {
            queue: queue.to_string(),
            routing_key: routing_key.to_string(),
            payload: payload.to_vec(),
        })
        .await
    }

    async fn shutdown(&mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}

/// Sink that forwards payloads to a broker queue.
///
/// With no configured routing keys the sink is a wildcard and accepts every
/// route; the envelope route becomes the effective routing key either way.
pub struct BrokerSink {
    name: String,
    queue: String,
    routes: RouteFilter,
    channel: Box<dyn BrokerChannel>,
}

impl BrokerSink {
    /// Create a sink over an already-connected channel
    pub fn new(
        name: impl Into<String>,
        queue: impl Into<String>,
        routes: RouteFilter,
        channel: Box<dyn BrokerChannel>,
    ) -> Self {
        Self {
            name: name.into(),
            queue: queue.into(),
            routes,
            channel,
        }
    }

    /// Connect the TCP transport and build the sink
    pub async fn connect(
        name: impl Into<String>,
        address: &str,
        user: &str,
        password: &str,
        queue: impl Into<String>,
        routes: RouteFilter,
    ) -> std::io::Result<Self> {
        let channel = TcpBrokerChannel::connect(address, user, password).await?;
        Ok(Self::new(name, queue, routes, Box::new(channel)))
    }

    /// Destination queue name
    pub fn queue(&self) -> &str {
        &self.queue
    }
}

#[async_trait]
impl StreamSink for BrokerSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn routes(&self) -> &RouteFilter {
        &self.routes
    }

    #[instrument(
        name = "broker_sink_publish",
        skip(self, payload),
        fields(sink = %self.name, queue = %self.queue, route = %route)
    )]
    async fn publish(&mut self, route: &str, payload: &[u8]) -> Result<(), PublishError> {
        self.channel
            .send(&self.queue, route, payload)
            .await
            .map_err(|e| PublishError::new(&self.name, e.to_string()))
    }

    async fn close(&mut self) -> Result<(), PublishError> {
        debug!(sink = %self.name, "BrokerSink closing");
        self.channel
            .shutdown()
            .await
            .map_err(|e| PublishError::new(&self.name, e.to_string()))
    }
}
