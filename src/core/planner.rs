//! # Route Planner
//!
//! Free-text destination in, decoded `Route` out:
//!
//! ```text
//! "San Francisco CA" → "San+Francisco+CA" → directions → "_p~iF~ps|U..." → [Position]
//! ```
//!
//! Only the first route the provider returns is used. Any failure leaves the
//! caller's current route alone; the planner itself holds no state, so calling
//! it twice with the same inputs yields the same `Route`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use url::form_urlencoded;

use crate::geo::polyline;
use crate::geo::{DecodeError, Position, Route};
use crate::services::{DirectionsProvider, ProviderError};

/// Why a route could not be produced. All variants surface to the user the
/// same way: a blocking "route request failed" notification.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Network, HTTP, status, or parse failure at the provider.
    Request(ProviderError),
    /// The provider answered but found no route.
    NoRoutes,
    /// The overview path could not be decoded.
    Malformed(DecodeError),
    /// Nothing to search for.
    EmptyDestination,
    /// No fix yet, so there is no origin.
    NoOrigin,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Request(e) => write!(f, "route request failed: {e}"),
            RouteError::NoRoutes => write!(f, "route request failed: no route found"),
            RouteError::Malformed(e) => write!(f, "route request failed: {e}"),
            RouteError::EmptyDestination => {
                write!(f, "route request failed: enter a destination first")
            }
            RouteError::NoOrigin => {
                write!(f, "route request failed: current position unknown")
            }
        }
    }
}

impl std::error::Error for RouteError {}

impl From<ProviderError> for RouteError {
    fn from(e: ProviderError) -> Self {
        RouteError::Request(e)
    }
}

impl From<DecodeError> for RouteError {
    fn from(e: DecodeError) -> Self {
        RouteError::Malformed(e)
    }
}

/// Collapses whitespace runs and joins the form-encoded words with `+`.
///
/// Returns an empty string for blank input.
pub fn normalize_destination(text: &str) -> String {
    text.split_whitespace()
        .map(|word| form_urlencoded::byte_serialize(word.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("+")
}

#[derive(Clone)]
pub struct RoutePlanner {
    directions: Arc<dyn DirectionsProvider>,
    timeout: Duration,
}

impl RoutePlanner {
    pub fn new(directions: Arc<dyn DirectionsProvider>, timeout: Duration) -> Self {
        Self {
            directions,
            timeout,
        }
    }

    pub async fn plan_route(
        &self,
        origin: Position,
        destination_text: &str,
    ) -> Result<Route, RouteError> {
        let destination = normalize_destination(destination_text);
        if destination.is_empty() {
            return Err(RouteError::EmptyDestination);
        }

        info!(
            "Planning route via {} to {}",
            self.directions.name(),
            destination
        );
        let paths = tokio::time::timeout(
            self.timeout,
            self.directions.overview_paths(origin, &destination),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.timeout))??;

        let encoded = paths.into_iter().next().ok_or(RouteError::NoRoutes)?;
        let route = Route::from(polyline::decode(&encoded)?);
        debug!("Decoded route with {} points", route.len());
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingDirections, StaticDirections};

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    macro_rules! test_normalize_destination {
        ( $($name:ident: $input:expr => $expected:expr,)+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(normalize_destination($input), $expected);
                }
            )+
        };
    }

    test_normalize_destination! {
        test_normalize_spaces_become_plus: "San Francisco CA" => "San+Francisco+CA",
        test_normalize_collapses_runs: "San   Francisco\tCA" => "San+Francisco+CA",
        test_normalize_trims_edges: "  Oakland  " => "Oakland",
        test_normalize_blank_is_empty: " \t " => "",
        test_normalize_escapes_reserved: "A&W #1" => "A%26W+%231",
        test_normalize_escapes_literal_plus: "C++ Ave" => "C%2B%2B+Ave",
    }

    fn origin() -> Position {
        Position::new(37.78825, -122.4324).unwrap()
    }

    fn planner(directions: impl DirectionsProvider + 'static) -> RoutePlanner {
        RoutePlanner::new(Arc::new(directions), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_plan_route_decodes_first_route() {
        let planner = planner(StaticDirections::new(vec![REFERENCE, "??"]));
        let route = planner.plan_route(origin(), "San Francisco CA").await.unwrap();
        assert_eq!(route.len(), 3);
        assert!((route.points[2].longitude - -126.453).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_plan_route_is_repeatable() {
        let planner = planner(StaticDirections::new(vec![REFERENCE]));
        let first = planner.plan_route(origin(), "Somewhere").await.unwrap();
        let second = planner.plan_route(origin(), "Somewhere").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_plan_route_passes_normalized_destination() {
        let directions = StaticDirections::new(vec![REFERENCE]);
        let seen = directions.seen.clone();
        planner(directions)
            .plan_route(origin(), "San Francisco CA")
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), ["San+Francisco+CA"]);
    }

    #[tokio::test]
    async fn test_zero_routes_is_no_routes() {
        let err = planner(StaticDirections::new(Vec::new()))
            .plan_route(origin(), "Nowhere")
            .await
            .unwrap_err();
        assert_eq!(err, RouteError::NoRoutes);
    }

    #[tokio::test]
    async fn test_truncated_polyline_is_malformed() {
        let err = planner(StaticDirections::new(vec!["_p~iF~ps|"]))
            .plan_route(origin(), "Somewhere")
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_is_request_error() {
        let err = planner(FailingDirections)
            .plan_route(origin(), "Somewhere")
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Request(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn test_blank_destination_skips_provider() {
        let directions = StaticDirections::new(vec![REFERENCE]);
        let seen = directions.seen.clone();
        let err = planner(directions).plan_route(origin(), "   ").await.unwrap_err();
        assert_eq!(err, RouteError::EmptyDestination);
        assert!(seen.lock().unwrap().is_empty());
    }
}
