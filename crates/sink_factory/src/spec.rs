//! Sink spec grammars
//!
//! Logger spec: `ROUTE[,ROUTE,...]` — the accepted route set; an empty list
//! yields a sink that accepts nothing.
//!
//! Broker spec: `USER:PASSWORD@HOST:PORT/QUEUE[/KEY,KEY,...]` — credentials,
//! broker address, destination queue, optional routing keys. A missing key
//! segment means the sink accepts every route (wildcard).

use contracts::{ConfigError, RouteFilter};

/// Parsed broker spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSpec {
    pub user: String,
    pub password: String,
    /// `HOST:PORT`
    pub address: String,
    pub queue: String,
    pub routes: RouteFilter,
}

impl BrokerSpec {
    /// Registry name for the sink built from this spec
    pub fn sink_name(&self) -> String {
        format!("broker-{}", self.queue)
    }
}

/// Parse a logger spec into its accepted route set.
///
/// Every comma-separated entry is one route name; the grammar itself cannot
/// fail, an empty spec simply accepts nothing.
pub fn parse_logger_spec(spec: &str) -> RouteFilter {
    RouteFilter::named(spec.split(','))
}

/// Parse a broker spec, failing with a `ConfigError` that names the spec.
pub fn parse_broker_spec(spec: &str) -> Result<BrokerSpec, ConfigError> {
    let malformed = |message: &str| ConfigError::malformed_spec(spec, message);

    let (credentials, rest) = spec
        .split_once('@')
        .ok_or_else(|| malformed("expected USER:PASSWORD@HOST:PORT/QUEUE[/KEY,...]"))?;

    let (user, password) = credentials
        .split_once(':')
        .ok_or_else(|| malformed("credentials must be USER:PASSWORD"))?;
    if user.is_empty() {
        return Err(malformed("user must not be empty"));
    }
    if password.is_empty() {
        return Err(malformed("password must not be empty"));
    }

    let (address, destination) = rest
        .split_once('/')
        .ok_or_else(|| malformed("missing '/QUEUE' segment after address"))?;

    let (host, port) = address
        .split_once(':')
        .ok_or_else(|| malformed("address must be HOST:PORT"))?;
    if host.is_empty() {
        return Err(malformed("host must not be empty"));
    }
    port.parse::<u16>()
        .map_err(|_| malformed(&format!("invalid port '{port}'")))?;

    let (queue, routes) = match destination.split_once('/') {
        Some((queue, keys)) => {
            let filter = RouteFilter::named(keys.split(','));
            if filter.route_count() == 0 {
                return Err(malformed("routing key segment is empty"));
            }
            (queue, filter)
        }
        None => (destination, RouteFilter::Any),
    };
    if queue.is_empty() {
        return Err(malformed("queue must not be empty"));
    }

    Ok(BrokerSpec {
        user: user.to_string(),
        password: password.to_string(),
        address: address.to_string(),
        queue: queue.to_string(),
        routes,
    })
}
