//! Yelp Fusion business search, used for the food layer.
//!
//! `GET {base}/businesses/search?term=..&latitude=..&longitude=..&radius=..`
//! authenticated with a bearer token.

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::geo::{Category, Position, VenueMarker};
use crate::services::providers::read_json;
use crate::services::{ProviderError, VenueProvider, VenueQuery};

pub const DEFAULT_YELP_BASE_URL: &str = "https://api.yelp.com/v3";
pub const DEFAULT_FOOD_TERM: &str = "food";

/// Yelp rejects larger radii.
const MAX_RADIUS_METERS: u32 = 40_000;

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[derive(Deserialize, Debug)]
struct Business {
    name: Option<String>,
    price: Option<String>,
    #[serde(default)]
    coordinates: Option<Coordinates>,
}

/// Yelp reports `null` or no coordinates for some listings.
#[derive(Deserialize, Debug)]
struct Coordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl Business {
    fn into_marker(self) -> Option<VenueMarker> {
        let coordinates = self.coordinates?;
        let position = Position::new(coordinates.latitude?, coordinates.longitude?).ok()?;
        Some(VenueMarker {
            position,
            category: Category::Food,
            label: self.name,
            price_info: self.price,
        })
    }
}

pub struct YelpProvider {
    api_key: String,
    base_url: String,
    term: String,
    client: reqwest::Client,
}

impl YelpProvider {
    pub fn new(api_key: String, base_url: Option<String>, term: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_YELP_BASE_URL.to_string()),
            term: term.unwrap_or_else(|| DEFAULT_FOOD_TERM.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VenueProvider for YelpProvider {
    fn name(&self) -> &str {
        "yelp"
    }

    fn category(&self) -> Category {
        Category::Food
    }

    async fn search(&self, query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError> {
        let radius = query.radius_meters.min(MAX_RADIUS_METERS);
        info!(
            "Yelp search: term={}, at={}, radius={}",
            self.term,
            query.position.to_query_value(),
            radius
        );

        let response = self
            .client
            .get(format!("{}/businesses/search", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[
                ("term", self.term.clone()),
                ("latitude", query.position.latitude.to_string()),
                ("longitude", query.position.longitude.to_string()),
                ("radius", radius.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body: SearchResponse = read_json(self.name(), response).await?;
        let total = body.businesses.len();
        let markers: Vec<VenueMarker> = body
            .businesses
            .into_iter()
            .filter_map(Business::into_marker)
            .collect();
        debug!("Yelp returned {} businesses, {} placeable", total, markers.len());
        Ok(markers)
    }
}
