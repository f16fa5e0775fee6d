use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::geo::InvalidPosition;

/// A raw reading from the device. Coordinates are unchecked until the
/// tracker validates them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            timestamp: Utc::now(),
        }
    }
}

/// Options for the one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(20_000),
            maximum_age: Duration::from_millis(1_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The user refused location access. Not retryable.
    PermissionDenied,
    /// The source could not produce a reading.
    Unavailable(String),
    /// No reading within `PositionOptions::timeout`.
    Timeout,
    /// The reading is older than `PositionOptions::maximum_age`.
    Stale { age_ms: i64 },
    /// The reading is not a valid coordinate pair.
    InvalidCoordinates(InvalidPosition),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "location permission denied"),
            LocationError::Unavailable(msg) => write!(f, "location unavailable: {msg}"),
            LocationError::Timeout => write!(f, "location request timed out"),
            LocationError::Stale { age_ms } => {
                write!(f, "location reading is stale ({age_ms} ms old)")
            }
            LocationError::InvalidCoordinates(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LocationError {}

impl From<InvalidPosition> for LocationError {
    fn from(e: InvalidPosition) -> Self {
        LocationError::InvalidCoordinates(e)
    }
}

/// A live position watch.
///
/// Readings arrive in order through `next()`. Dropping the subscription
/// clears the watch: the receiver closes and the producer task, if any, is
/// aborted.
pub struct Subscription {
    receiver: mpsc::Receiver<Result<Fix, LocationError>>,
    producer: Option<AbortHandle>,
}

impl Subscription {
    pub fn new(
        receiver: mpsc::Receiver<Result<Fix, LocationError>>,
        producer: Option<AbortHandle>,
    ) -> Self {
        Self { receiver, producer }
    }

    /// Next reading, or `None` once the source has ended the watch.
    pub async fn next(&mut self) -> Option<Result<Fix, LocationError>> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(handle) = self.producer.take() {
            handle.abort();
        }
    }
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Returns the name of the source.
    fn name(&self) -> &str;

    /// One-shot reading.
    async fn current_position(&self, options: &PositionOptions) -> Result<Fix, LocationError>;

    /// Starts a continuous watch. Must be called from within a tokio runtime.
    fn watch_position(&self, options: &PositionOptions) -> Subscription;
}
