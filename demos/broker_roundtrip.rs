//! Broker Roundtrip Demo
//!
//! Spins up an in-process broker stand-in on a loopback socket, connects a
//! broker sink to it through the factory, and dispatches envelopes end to
//! end. The stand-in just counts the length-framed messages it receives.
//!
//! Run with: cargo run --bin broker_roundtrip

use bytes::Bytes;
use contracts::{Envelope, StreamsConfig};
use dispatcher::Dispatcher;
use sink_factory::SinkFactory;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // ==== Stage 1: Broker stand-in ====
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?.to_string();
    tracing::info!(address = %address, "Broker stand-in listening");

    let server = tokio::spawn(async move {
        let (mut stream, peer) = listener.accept().await.unwrap();
        tracing::info!(peer = %peer, "Broker stand-in accepted connection");

        let mut frames = 0u32;
        loop {
            let mut len_bytes = [0u8; 4];
            if stream.read_exact(&mut len_bytes).await.is_err() {
                break;
            }
            let len = u32::from_le_bytes(len_bytes) as usize;
            let mut body = vec![0u8; len];
            stream.read_exact(&mut body).await.unwrap();
            frames += 1;
            tracing::info!(frame = frames, bytes = len, "Broker stand-in got frame");
        }
        frames
    });

    // ==== Stage 2: Factory builds the broker sink from a spec ====
    let streams = StreamsConfig {
        loggers: vec![],
        brokers: vec![format!("demo:demo@{address}/events/transfer,swap")],
    };
    let registry = SinkFactory::build_registry(&streams).await?;

    // ==== Stage 3: Dispatch a mixed route feed ====
    let (tx, rx) = mpsc::channel::<Bytes>(16);
    for (route, payload) in [
        ("transfer", &b"alice->bob:10"[..]),
        ("other", b"does not match the routing keys"),
        ("swap", b"eth/usd"),
    ] {
        let envelope = Envelope::v0(route, payload.to_vec());
        tx.send(Bytes::from(codec::encode(&envelope))).await?;
    }
    drop(tx);

    let summary = Dispatcher::new(registry).run(rx).await?;
    tracing::info!(
        envelopes = summary.envelopes,
        publishes = summary.publishes(),
        "Dispatch finished"
    );

    // Auth frame + the two matching publishes
    let frames = server.await?;
    tracing::info!(frames, "Broker stand-in received frames");
    assert_eq!(frames, 3);

    Ok(())
}
