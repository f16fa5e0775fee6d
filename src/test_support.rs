//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Semaphore, mpsc};

use crate::geo::{Category, Position, VenueMarker};
use crate::location::{Fix, LocationError, LocationSource, PositionOptions, Subscription};
use crate::services::{DirectionsProvider, ProviderError, VenueProvider, VenueQuery};

/// `count` markers spread just north of the query position.
pub fn markers_near(position: Position, category: Category, count: usize) -> Vec<VenueMarker> {
    (0..count)
        .map(|i| VenueMarker {
            position: Position {
                latitude: position.latitude + 0.001 * (i as f64 + 1.0),
                longitude: position.longitude,
            },
            category,
            label: Some(format!("{} {}", category.label(), i)),
            price_info: None,
        })
        .collect()
}

/// Always answers with `count` markers.
pub struct StaticVenues {
    category: Category,
    count: usize,
}

impl StaticVenues {
    pub fn new(category: Category, count: usize) -> Self {
        Self { category, count }
    }
}

#[async_trait]
impl VenueProvider for StaticVenues {
    fn name(&self) -> &str {
        "static"
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn search(&self, query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError> {
        Ok(markers_near(query.position, self.category, self.count))
    }
}

/// Always fails with a network error.
pub struct FailingVenues {
    category: Category,
}

impl FailingVenues {
    pub fn new(category: Category) -> Self {
        Self { category }
    }
}

#[async_trait]
impl VenueProvider for FailingVenues {
    fn name(&self) -> &str {
        "failing"
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn search(&self, _query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

/// Answers with one marker after `delay`.
pub struct SlowVenues {
    category: Category,
    delay: Duration,
}

impl SlowVenues {
    pub fn new(category: Category, delay: Duration) -> Self {
        Self { category, delay }
    }
}

#[async_trait]
impl VenueProvider for SlowVenues {
    fn name(&self) -> &str {
        "slow"
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn search(&self, query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(markers_near(query.position, self.category, 1))
    }
}

/// Holds every search until the test adds a permit to `gate`.
pub struct GatedVenues {
    category: Category,
    gate: Arc<Semaphore>,
}

impl GatedVenues {
    pub fn new(category: Category, gate: Arc<Semaphore>) -> Self {
        Self { category, gate }
    }
}

#[async_trait]
impl VenueProvider for GatedVenues {
    fn name(&self) -> &str {
        "gated"
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn search(&self, query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        permit.forget();
        Ok(markers_near(query.position, self.category, 1))
    }
}

/// Returns fixed encoded paths and records every destination it was asked for.
/// Flip `fail` to make subsequent calls error out.
pub struct StaticDirections {
    paths: Vec<String>,
    pub seen: Arc<Mutex<Vec<String>>>,
    pub fail: Arc<AtomicBool>,
}

impl StaticDirections {
    pub fn new(paths: Vec<&str>) -> Self {
        Self {
            paths: paths.into_iter().map(String::from).collect(),
            seen: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl DirectionsProvider for StaticDirections {
    fn name(&self) -> &str {
        "static"
    }

    async fn overview_paths(
        &self,
        _origin: Position,
        destination: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(destination.to_string());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.paths.clone())
    }
}

pub struct FailingDirections;

#[async_trait]
impl DirectionsProvider for FailingDirections {
    fn name(&self) -> &str {
        "failing"
    }

    async fn overview_paths(
        &self,
        _origin: Position,
        _destination: &str,
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

/// A location source driven by the test through the returned sender.
///
/// The watch can be started once; the sender's `closed()` resolves when the
/// subscription is released.
pub struct ScriptedSource {
    initial: Result<Fix, LocationError>,
    readings: Mutex<Option<mpsc::Receiver<Result<Fix, LocationError>>>>,
}

impl ScriptedSource {
    pub fn new(
        initial: Result<Fix, LocationError>,
    ) -> (Self, mpsc::Sender<Result<Fix, LocationError>>) {
        let (tx, rx) = mpsc::channel(16);
        let source = Self {
            initial,
            readings: Mutex::new(Some(rx)),
        };
        (source, tx)
    }
}

#[async_trait]
impl LocationSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Fix, LocationError> {
        self.initial.clone()
    }

    fn watch_position(&self, _options: &PositionOptions) -> Subscription {
        let receiver = self
            .readings
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_else(|| mpsc::channel(1).1);
        Subscription::new(receiver, None)
    }
}
