//! SinkFactory core implementation
//!
//! Builds concrete sinks from the ordered spec lists in `StreamsConfig` and
//! appends them to the registry. Loggers are fully processed before brokers,
//! matching declared configuration precedence; within one kind, declaration
//! order is preserved. The first bad spec aborts initialization, no partial
//! registry is ever returned as success.

use contracts::{ConfigError, StreamSink, StreamsConfig};
use dispatcher::{BrokerSink, LogSink};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{FactoryError, Result};
use crate::spec::{parse_broker_spec, parse_logger_spec};

/// Sink Factory
///
/// Stateless; each call parses the specs it is given and builds fresh sinks.
pub struct SinkFactory;

impl SinkFactory {
    /// Build the complete registry for a streams configuration.
    ///
    /// Broker sinks connect during initialization; a connection failure is a
    /// startup failure, same as a malformed spec.
    #[instrument(
        name = "sink_factory_build_registry",
        skip(streams),
        fields(loggers = streams.loggers.len(), brokers = streams.brokers.len())
    )]
    pub async fn build_registry(streams: &StreamsConfig) -> Result<Vec<Box<dyn StreamSink>>> {
        let mut registry: Vec<Box<dyn StreamSink>> = Vec::with_capacity(streams.sink_count());

        Self::initialize_loggers(&mut registry, &streams.loggers);
        Self::initialize_brokers(&mut registry, &streams.brokers).await?;

        info!(sinks = registry.len(), "initialized streams");
        observability::record_sinks_registered(registry.len());

        Ok(registry)
    }

    /// Append one LogSink per logger spec
    fn initialize_loggers(registry: &mut Vec<Box<dyn StreamSink>>, specs: &[String]) {
        for (i, spec) in specs.iter().enumerate() {
            let routes = parse_logger_spec(spec);
            let name = format!("logger-{i}");
            info!(sink = %name, routes = %routes, "logger stream initialized");
            registry.push(Box::new(LogSink::with_filter(name, routes)));
        }
    }

    /// Append one BrokerSink per broker spec, connecting each in turn
    async fn initialize_brokers(
        registry: &mut Vec<Box<dyn StreamSink>>,
        specs: &[String],
    ) -> Result<()> {
        for spec in specs {
            let parsed = parse_broker_spec(spec)?;
            let name = parsed.sink_name();

            let sink = BrokerSink::connect(
                &name,
                &parsed.address,
                &parsed.user,
                &parsed.password,
                &parsed.queue,
                parsed.routes.clone(),
            )
            .await
            .map_err(|e| {
                FactoryError::broker_connection(&name, &parsed.address, e.to_string())
            })?;

            info!(
                sink = %name,
                address = %parsed.address,
                queue = %parsed.queue,
                routes = %parsed.routes,
                "broker stream initialized"
            );
            registry.push(Box::new(sink));
        }
        Ok(())
    }

    /// Dry-parse every spec without building sinks or connecting.
    ///
    /// Used by `validate` to fail fast on grammar errors.
    pub fn check_specs(streams: &StreamsConfig) -> std::result::Result<(), ConfigError> {
        for spec in &streams.brokers {
            parse_broker_spec(spec)?;
        }
        Ok(())
    }

    /// Resolve the specs into a registration-ordered sink plan (for `info`)
    pub fn plan(streams: &StreamsConfig) -> std::result::Result<Vec<SinkPlan>, ConfigError> {
        let mut plan = Vec::with_capacity(streams.sink_count());

        for (i, spec) in streams.loggers.iter().enumerate() {
            plan.push(SinkPlan {
                name: format!("logger-{i}"),
                kind: "logger".to_string(),
                routes: parse_logger_spec(spec).to_string(),
                destination: None,
            });
        }
        for spec in &streams.brokers {
            let parsed = parse_broker_spec(spec)?;
            plan.push(SinkPlan {
                name: parsed.sink_name(),
                kind: "broker".to_string(),
                routes: parsed.routes.to_string(),
                destination: Some(format!("{}/{}", parsed.address, parsed.queue)),
            });
        }
        Ok(plan)
    }
}

/// One planned sink, in registration order
#[derive(Debug, Clone, Serialize)]
pub struct SinkPlan {
    pub name: String,
    pub kind: String,
    /// "*" for wildcard, comma-joined route names otherwise
    pub routes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn streams(loggers: Vec<&str>, brokers: Vec<&str>) -> StreamsConfig {
        StreamsConfig {
            loggers: loggers.into_iter().map(String::from).collect(),
            brokers: brokers.into_iter().map(String::from).collect(),
        }
    }

    /// Accepts broker connections and discards the bytes
    async fn fake_broker() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    while matches!(stream.read(&mut buf).await, Ok(n) if n > 0) {}
                });
            }
        });
        address
    }

    #[tokio::test]
    async fn test_empty_config_builds_empty_registry() {
        let registry = SinkFactory::build_registry(&StreamsConfig::default())
            .await
            .unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_loggers_precede_brokers_in_registration_order() {
        let address = fake_broker().await;
        let config = streams(
            vec!["transfer"],
            vec![&format!("alice:secret@{address}/q1")],
        );

        let registry = SinkFactory::build_registry(&config).await.unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry[0].name(), "logger-0");
        assert_eq!(registry[1].name(), "broker-q1");
    }

    #[tokio::test]
    async fn test_blank_logger_spec_builds_accept_nothing_sink() {
        let config = streams(vec![""], vec![]);
        let registry = SinkFactory::build_registry(&config).await.unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry[0].name(), "logger-0");
        assert!(!registry[0].matches_route("transfer"));
        assert!(!registry[0].matches_route(""));
    }

    #[tokio::test]
    async fn test_malformed_broker_spec_aborts_initialization() {
        let config = streams(vec!["transfer"], vec!["not-a-spec"]);
        let err = SinkFactory::build_registry(&config).await.err().unwrap();
        assert!(err.to_string().contains("not-a-spec"));
    }

    #[tokio::test]
    async fn test_unreachable_broker_is_startup_failure() {
        // Port 1 on localhost refuses connections
        let config = streams(vec![], vec!["alice:secret@127.0.0.1:1/q1"]);
        let err = SinkFactory::build_registry(&config).await.err().unwrap();
        assert!(matches!(err, FactoryError::BrokerConnection { .. }));
    }

    #[test]
    fn test_check_specs_reports_first_bad_spec() {
        let config = streams(vec![], vec!["a:b@h:1/q", "broken"]);
        let err = SinkFactory::check_specs(&config).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_plan_orders_and_describes_sinks() {
        let config = streams(
            vec!["transfer,swap"],
            vec!["alice:secret@localhost:5672/q1"],
        );
        let plan = SinkFactory::plan(&config).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].kind, "logger");
        assert_eq!(plan[0].routes, "swap,transfer");
        assert_eq!(plan[1].kind, "broker");
        assert_eq!(plan[1].routes, "*");
        assert_eq!(plan[1].destination.as_deref(), Some("localhost:5672/q1"));
    }
}
