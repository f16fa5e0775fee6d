//! Scripted location sources.
//!
//! There is no device GPS behind a terminal, so the binary drives the tracker
//! from either a recorded track (`ReplaySource`) or a single pinned point
//! (`FixedSource`). Both produce readings on a fixed interval.

use std::fs;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use tokio::sync::mpsc;

use super::source::{Fix, LocationError, LocationSource, PositionOptions, Subscription};

/// Readings buffered between the producer and the tracker.
const WATCH_BUFFER: usize = 16;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
}

impl TrackPoint {
    fn to_fix(self) -> Fix {
        Fix {
            accuracy_meters: self.accuracy_meters,
            ..Fix::now(self.latitude, self.longitude)
        }
    }
}

/// Replays a track once, one point per `interval`, then ends the watch.
pub struct ReplaySource {
    points: Vec<TrackPoint>,
    interval: Duration,
}

impl ReplaySource {
    pub fn new(points: Vec<TrackPoint>, interval: Duration) -> Self {
        Self { points, interval }
    }

    /// Loads a JSON array of `{ "latitude": .., "longitude": .. }` objects.
    pub fn from_file(path: &Path, interval: Duration) -> Result<Self, LocationError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LocationError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let points: Vec<TrackPoint> = serde_json::from_str(&contents).map_err(|e| {
            LocationError::Unavailable(format!("cannot parse {}: {e}", path.display()))
        })?;
        info!("Loaded {} track points from {}", points.len(), path.display());
        Ok(Self::new(points, interval))
    }
}

#[async_trait]
impl LocationSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Fix, LocationError> {
        self.points
            .first()
            .map(|p| p.to_fix())
            .ok_or_else(|| LocationError::Unavailable("track is empty".to_string()))
    }

    fn watch_position(&self, _options: &PositionOptions) -> Subscription {
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        let points = self.points.clone();
        let interval = self.interval;

        let producer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            for point in points {
                ticker.tick().await;
                if tx.send(Ok(point.to_fix())).await.is_err() {
                    debug!("Replay watch released by consumer");
                    return;
                }
            }
            debug!("Replay track exhausted");
        });

        Subscription::new(rx, Some(producer.abort_handle()))
    }
}

/// Reports the same position forever.
pub struct FixedSource {
    point: TrackPoint,
    interval: Duration,
}

impl FixedSource {
    pub fn new(latitude: f64, longitude: f64, interval: Duration) -> Self {
        Self {
            point: TrackPoint {
                latitude,
                longitude,
                accuracy_meters: None,
            },
            interval,
        }
    }
}

#[async_trait]
impl LocationSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Fix, LocationError> {
        Ok(self.point.to_fix())
    }

    fn watch_position(&self, _options: &PositionOptions) -> Subscription {
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        let point = self.point;
        let interval = self.interval;

        let producer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if tx.send(Ok(point.to_fix())).await.is_err() {
                    debug!("Fixed watch released by consumer");
                    return;
                }
            }
        });

        Subscription::new(rx, Some(producer.abort_handle()))
    }
}
