//! RouteFilter - a sink's configured route set.

use std::collections::BTreeSet;

/// Route-matching predicate configured per sink.
///
/// Matching is exact-string, case-sensitive membership; no glob or regex
/// semantics. `Named` with an empty set matches nothing, which is distinct
/// from the explicit `Any` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFilter {
    /// Wildcard: every route matches
    Any,
    /// Exact membership in the configured set
    Named(BTreeSet<String>),
}

impl RouteFilter {
    /// Build a `Named` filter from route names, ignoring surrounding whitespace
    pub fn named<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Named(
            routes
                .into_iter()
                .map(|r| r.as_ref().trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    /// Whether `route` is accepted by this filter
    pub fn matches(&self, route: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(routes) => routes.contains(route),
        }
    }

    /// True for the wildcard filter
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Number of named routes (0 for wildcard)
    pub fn route_count(&self) -> usize {
        match self {
            Self::Any => 0,
            Self::Named(routes) => routes.len(),
        }
    }
}

impl std::fmt::Display for RouteFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Named(routes) => {
                let mut first = true;
                for route in routes {
                    if !first {
                        write!(f, ",")?;
                    }
                    write!(f, "{route}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}
