//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Responsibilities:
//! - contract snapshot tests
//! - full pipeline e2e tests (spec parsing through fan-out)
//! - wire format compatibility checks

#[cfg(test)]
mod contract_tests {
    use contracts::{Envelope, RouteFilter};

    #[test]
    fn test_envelope_accessors() {
        let envelope = Envelope::v0("transfer", b"payload".to_vec());
        assert_eq!(envelope.route(), "transfer");
        assert_eq!(envelope.payload().as_ref(), b"payload");
    }

    #[test]
    fn test_route_filter_semantics() {
        let any = RouteFilter::Any;
        assert!(any.matches("anything"));
        assert!(any.matches(""));

        let named = RouteFilter::named(["transfer", "swap"]);
        assert!(named.matches("transfer"));
        assert!(named.matches("swap"));
        assert!(!named.matches("Transfer")); // case sensitive
        assert!(!named.matches("transfers"));

        let empty = RouteFilter::named(Vec::<String>::new());
        assert!(!empty.matches("transfer"));
        assert!(!empty.matches(""));
    }
}

#[cfg(test)]
mod wire_tests {
    use contracts::{DecodeError, Envelope};

    #[test]
    fn test_round_trip_through_codec() {
        let envelope = Envelope::v0("blocks", vec![0u8; 300]);
        let bytes = codec::encode(&envelope);
        let decoded = codec::decode(&bytes).unwrap();
        assert_eq!(decoded.route(), "blocks");
        assert_eq!(decoded.payload().len(), 300);
    }

    #[test]
    fn test_unknown_version_surfaced() {
        // Version discriminant 1 has no decoder yet
        let err = codec::decode(&[0x01]).unwrap_err();
        assert_eq!(err, DecodeError::UnknownVersion(1));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = codec::encode(&Envelope::v0("r", b"p".to_vec()));
        bytes.push(0xFF);
        assert!(matches!(
            codec::decode(&bytes),
            Err(DecodeError::MalformedEnvelope { .. })
        ));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;
    use contracts::{Envelope, PublishError, RouteFilter, StreamSink, StreamsConfig};
    use dispatcher::Dispatcher;
    use sink_factory::SinkFactory;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Sink that records every delivery into a shared journal.
    struct RecordingSink {
        name: String,
        routes: RouteFilter,
        journal: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingSink {
        fn new(
            name: &str,
            routes: RouteFilter,
            journal: Arc<Mutex<Vec<(String, String)>>>,
        ) -> Box<dyn StreamSink> {
            Box::new(Self {
                name: name.to_string(),
                routes,
                journal,
            })
        }
    }

    #[async_trait]
    impl StreamSink for RecordingSink {
        fn name(&self) -> &str {
            &self.name
        }

        fn routes(&self) -> &RouteFilter {
            &self.routes
        }

        async fn publish(&mut self, route: &str, _payload: &[u8]) -> Result<(), PublishError> {
            self.journal
                .lock()
                .unwrap()
                .push((self.name.clone(), route.to_string()));
            Ok(())
        }

        async fn close(&mut self) -> Result<(), PublishError> {
            Ok(())
        }
    }

    /// End-to-end fan-out: a named logger and a wildcard broker stand-in.
    ///
    /// An envelope routed "transfer" reaches both sinks, in registration
    /// order; an envelope routed "other" reaches only the wildcard sink.
    #[tokio::test]
    async fn test_e2e_fan_out_ordering() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let registry = vec![
            RecordingSink::new("logger", RouteFilter::named(["transfer"]), journal.clone()),
            RecordingSink::new("broker", RouteFilter::Any, journal.clone()),
        ];

        let dispatcher = Dispatcher::new(registry);
        let (tx, rx) = mpsc::channel::<Bytes>(8);

        tx.send(Bytes::from(codec::encode(&Envelope::v0(
            "transfer",
            b"t".to_vec(),
        ))))
        .await
        .unwrap();
        tx.send(Bytes::from(codec::encode(&Envelope::v0(
            "other",
            b"o".to_vec(),
        ))))
        .await
        .unwrap();
        drop(tx);

        let summary = dispatcher.run(rx).await.unwrap();
        assert_eq!(summary.envelopes, 2);
        assert_eq!(summary.publishes(), 3);
        assert_eq!(summary.failures(), 0);

        let deliveries = journal.lock().unwrap().clone();
        assert_eq!(
            deliveries,
            vec![
                ("logger".to_string(), "transfer".to_string()),
                ("broker".to_string(), "transfer".to_string()),
                ("broker".to_string(), "other".to_string()),
            ]
        );
    }

    /// Empty configuration produces an empty registry; envelopes are
    /// consumed and counted without any publish.
    #[tokio::test]
    async fn test_e2e_empty_configuration() {
        let registry = SinkFactory::build_registry(&StreamsConfig::default())
            .await
            .unwrap();
        assert!(registry.is_empty());

        let dispatcher = Dispatcher::new(registry);
        let (tx, rx) = mpsc::channel::<Bytes>(8);
        tx.send(Bytes::from(codec::encode(&Envelope::v0(
            "transfer",
            b"t".to_vec(),
        ))))
        .await
        .unwrap();
        drop(tx);

        let summary = dispatcher.run(rx).await.unwrap();
        assert_eq!(summary.envelopes, 1);
        assert_eq!(summary.publishes(), 0);
    }

    /// Full path from textual specs through the factory to the broker
    /// socket: the broker receives one auth frame plus one frame per
    /// matching envelope.
    #[tokio::test]
    async fn test_e2e_specs_to_broker_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut frames = 0u32;
            loop {
                let mut len_bytes = [0u8; 4];
                match stream.read_exact(&mut len_bytes).await {
                    Ok(_) => {}
                    Err(_) => break, // client closed
                }
                let len = u32::from_le_bytes(len_bytes) as usize;
                let mut body = vec![0u8; len];
                stream.read_exact(&mut body).await.unwrap();
                frames += 1;
            }
            frames
        });

        let config = StreamsConfig {
            loggers: vec!["transfer".to_string()],
            brokers: vec![format!("guest:guest@{address}/events")],
        };

        let registry = SinkFactory::build_registry(&config).await.unwrap();
        assert_eq!(registry.len(), 2);
        // Loggers register before brokers
        assert_eq!(registry[0].name(), "logger-0");
        assert_eq!(registry[1].name(), "broker-events");

        let dispatcher = Dispatcher::new(registry);
        let (tx, rx) = mpsc::channel::<Bytes>(8);
        tx.send(Bytes::from(codec::encode(&Envelope::v0(
            "transfer",
            b"t".to_vec(),
        ))))
        .await
        .unwrap();
        tx.send(Bytes::from(codec::encode(&Envelope::v0(
            "other",
            b"o".to_vec(),
        ))))
        .await
        .unwrap();
        drop(tx);

        let summary = dispatcher.run(rx).await.unwrap();
        assert_eq!(summary.envelopes, 2);

        // Auth frame + two publishes (broker spec without keys is wildcard)
        assert_eq!(server.await.unwrap(), 3);
    }

    /// A malformed buffer fails the dispatch and is not silently skipped.
    #[tokio::test]
    async fn test_e2e_malformed_buffer_aborts() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let registry = vec![RecordingSink::new(
            "logger",
            RouteFilter::Any,
            journal.clone(),
        )];

        let dispatcher = Dispatcher::new(registry);
        let (tx, rx) = mpsc::channel::<Bytes>(8);
        tx.send(Bytes::from(codec::encode(&Envelope::v0(
            "transfer",
            b"t".to_vec(),
        ))))
        .await
        .unwrap();
        tx.send(Bytes::from_static(&[0x00, 0xFF])).await.unwrap();
        drop(tx);

        let err = dispatcher.run(rx).await.unwrap_err();
        let dispatcher::DispatchError::Decode {
            envelopes_dispatched,
            ..
        } = err;
        assert_eq!(envelopes_dispatched, 1);
        assert_eq!(journal.lock().unwrap().len(), 1);
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::ConfigLoader;
    use sink_factory::SinkFactory;

    #[test]
    fn test_toml_config_drives_factory_plan() {
        let config = ConfigLoader::load_from_str(
            r#"
            [source]
            input = "feed.bin"

            [streams]
            loggers = ["transfer,swap"]
            brokers = ["guest:guest@localhost:5672/events/transfer"]
            "#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let plan = SinkFactory::plan(&config.streams).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].kind, "logger");
        assert_eq!(plan[1].kind, "broker");
        assert_eq!(plan[1].name, "broker-events");
    }

    #[test]
    fn test_malformed_broker_spec_rejected_at_check() {
        let config = ConfigLoader::load_from_str(
            r#"
            [streams]
            brokers = ["no-at-sign-here"]
            "#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        assert!(SinkFactory::check_specs(&config.streams).is_err());
    }
}
