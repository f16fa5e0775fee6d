use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::geo::{Category, Position, VenueMarker};

/// Errors that can occur while talking to a remote provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL). Not retryable.
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// No response within the per-call budget.
    Timeout(Duration),
    /// Non-2xx HTTP response.
    Api { status: u16, message: String },
    /// Body did not match the expected shape.
    Parse(String),
    /// HTTP 200 whose payload `status` reports an error (e.g. `REQUEST_DENIED`).
    Status { status: String, message: Option<String> },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Timeout(after) => {
                write!(f, "request timed out after {}s", after.as_secs_f32())
            }
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::Status { status, message } => match message {
                Some(message) => write!(f, "provider status {status}: {message}"),
                None => write!(f, "provider status {status}"),
            },
        }
    }
}

impl std::error::Error for ProviderError {}

/// Where to search for venues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VenueQuery {
    pub position: Position,
    pub radius_meters: u32,
}

/// A read-only nearby-venue search.
#[async_trait]
pub trait VenueProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// The category every returned marker carries.
    fn category(&self) -> Category;

    /// Runs one search. Entries without usable coordinates are skipped.
    async fn search(&self, query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError>;
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Encoded overview paths of every route found, best first. An empty list
    /// means the provider found no route.
    ///
    /// `destination` is an already-normalized query fragment.
    async fn overview_paths(
        &self,
        origin: Position,
        destination: &str,
    ) -> Result<Vec<String>, ProviderError>;
}
