//! Concurrent fetch of both venue layers.
//!
//! Both searches start together and the batch is only returned once both have
//! settled. Each provider gets its own timeout; a provider that fails or times
//! out contributes an empty list and never holds back the other one.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join;
use log::{debug, warn};

use crate::geo::VenueMarker;
use crate::services::{ProviderError, VenueProvider, VenueQuery};

#[derive(Clone)]
pub struct VenueSources {
    pub food: Arc<dyn VenueProvider>,
    pub fuel: Arc<dyn VenueProvider>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VenueBatch {
    pub food: Vec<VenueMarker>,
    pub fuel: Vec<VenueMarker>,
}

impl VenueSources {
    pub async fn fetch_all(&self, query: VenueQuery, timeout: Duration) -> VenueBatch {
        let (food, fuel) = join(
            fetch_or_empty(self.food.as_ref(), &query, timeout),
            fetch_or_empty(self.fuel.as_ref(), &query, timeout),
        )
        .await;
        VenueBatch { food, fuel }
    }
}

/// One search bounded by `timeout`.
pub async fn fetch_with_timeout(
    provider: &dyn VenueProvider,
    query: &VenueQuery,
    timeout: Duration,
) -> Result<Vec<VenueMarker>, ProviderError> {
    tokio::time::timeout(timeout, provider.search(query))
        .await
        .map_err(|_| ProviderError::Timeout(timeout))?
}

async fn fetch_or_empty(
    provider: &dyn VenueProvider,
    query: &VenueQuery,
    timeout: Duration,
) -> Vec<VenueMarker> {
    match fetch_with_timeout(provider, query, timeout).await {
        Ok(markers) => {
            debug!("{} returned {} markers", provider.name(), markers.len());
            markers
        }
        Err(e) => {
            warn!(
                "{} fetch failed, showing no {} markers this cycle: {}",
                provider.name(),
                provider.category().label(),
                e
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Category, Position};
    use crate::test_support::{FailingVenues, SlowVenues, StaticVenues};

    fn query() -> VenueQuery {
        VenueQuery {
            position: Position::new(37.0, -122.0).unwrap(),
            radius_meters: 8500,
        }
    }

    #[tokio::test]
    async fn test_both_succeed() {
        let sources = VenueSources {
            food: Arc::new(StaticVenues::new(Category::Food, 2)),
            fuel: Arc::new(StaticVenues::new(Category::Fuel, 3)),
        };
        let batch = sources.fetch_all(query(), Duration::from_secs(1)).await;
        assert_eq!(batch.food.len(), 2);
        assert_eq!(batch.fuel.len(), 3);
        assert!(batch.food.iter().all(|m| m.category == Category::Food));
        assert!(batch.fuel.iter().all(|m| m.category == Category::Fuel));
    }

    #[tokio::test]
    async fn test_failed_provider_yields_empty_list_only_for_itself() {
        let sources = VenueSources {
            food: Arc::new(StaticVenues::new(Category::Food, 2)),
            fuel: Arc::new(FailingVenues::new(Category::Fuel)),
        };
        let batch = sources.fetch_all(query(), Duration::from_secs(1)).await;
        assert_eq!(batch.food.len(), 2);
        assert!(batch.fuel.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out_to_empty() {
        let sources = VenueSources {
            food: Arc::new(SlowVenues::new(Category::Food, Duration::from_secs(60))),
            fuel: Arc::new(StaticVenues::new(Category::Fuel, 1)),
        };
        let batch = sources.fetch_all(query(), Duration::from_secs(10)).await;
        assert!(batch.food.is_empty());
        assert_eq!(batch.fuel.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_with_timeout_reports_timeout() {
        let slow = SlowVenues::new(Category::Food, Duration::from_secs(60));
        let err = fetch_with_timeout(&slow, &query(), Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Timeout(Duration::from_secs(10)));
    }
}
