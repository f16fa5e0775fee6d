//! Google Places nearby search, used for the fuel layer.
//!
//! `GET {base}/nearbysearch/json?location=lat,lon&radius=..&type=..&key=..`

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::geo::{Category, Position, VenueMarker};
use crate::services::providers::read_json;
use crate::services::{ProviderError, VenueProvider, VenueQuery};

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_FUEL_TYPE: &str = "gas_station";

#[derive(Deserialize, Debug)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<Place>,
    error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Place {
    name: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    price: Option<String>,
    /// 0 (free) to 4 (very expensive).
    price_level: Option<u8>,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize, Debug)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}

impl Place {
    fn into_marker(self) -> Option<VenueMarker> {
        let location = self.geometry?.location;
        let position = Position::new(location.lat?, location.lng?).ok()?;
        let price_info = self
            .price
            .or_else(|| self.price_level.map(|level| "$".repeat(usize::from(level))))
            .filter(|p| !p.is_empty());
        Some(VenueMarker {
            position,
            category: Category::Fuel,
            label: self.name,
            price_info,
        })
    }
}

pub struct PlacesProvider {
    api_key: String,
    base_url: String,
    place_type: String,
    client: reqwest::Client,
}

impl PlacesProvider {
    pub fn new(api_key: String, base_url: Option<String>, place_type: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_PLACES_BASE_URL.to_string()),
            place_type: place_type.unwrap_or_else(|| DEFAULT_FUEL_TYPE.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VenueProvider for PlacesProvider {
    fn name(&self) -> &str {
        "places"
    }

    fn category(&self) -> Category {
        Category::Fuel
    }

    async fn search(&self, query: &VenueQuery) -> Result<Vec<VenueMarker>, ProviderError> {
        info!(
            "Places search: type={}, at={}, radius={}",
            self.place_type,
            query.position.to_query_value(),
            query.radius_meters
        );

        let response = self
            .client
            .get(format!("{}/nearbysearch/json", self.base_url))
            .query(&[
                ("location", query.position.to_query_value()),
                ("radius", query.radius_meters.to_string()),
                ("type", self.place_type.clone()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body: NearbyResponse = read_json(self.name(), response).await?;
        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            _ => {
                warn!("Places status {}: {:?}", body.status, body.error_message);
                return Err(ProviderError::Status {
                    status: body.status,
                    message: body.error_message,
                });
            }
        }

        let markers: Vec<VenueMarker> = body
            .results
            .into_iter()
            .filter_map(Place::into_marker)
            .collect();
        debug!("Places returned {} stations", markers.len());
        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(json: &str) -> Place {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_price_level_renders_as_dollars() {
        let marker = place(
            r#"{"name": "Shell", "price_level": 2, "geometry": {"location": {"lat": 1.0, "lng": 2.0}}}"#,
        )
        .into_marker()
        .unwrap();
        assert_eq!(marker.price_info.as_deref(), Some("$$"));
        assert_eq!(marker.category, Category::Fuel);
        assert_eq!(marker.position, Position::new(1.0, 2.0).unwrap());
    }

    #[test]
    fn test_explicit_price_wins_over_level() {
        let marker = place(
            r#"{"price": "3.99/gal", "price_level": 2, "geometry": {"location": {"lat": 1.0, "lng": 2.0}}}"#,
        )
        .into_marker()
        .unwrap();
        assert_eq!(marker.price_info.as_deref(), Some("3.99/gal"));
        assert_eq!(marker.label, None);
    }

    #[test]
    fn test_zero_price_level_has_no_price() {
        let marker = place(r#"{"price_level": 0, "geometry": {"location": {"lat": 1.0, "lng": 2.0}}}"#)
            .into_marker()
            .unwrap();
        assert_eq!(marker.price_info, None);
    }

    #[test]
    fn test_out_of_range_location_is_skipped() {
        let marker = place(r#"{"geometry": {"location": {"lat": 123.0, "lng": 2.0}}}"#).into_marker();
        assert!(marker.is_none());
    }

    #[test]
    fn test_place_without_usable_location_does_not_drop_the_list() {
        let json = r#"{"status": "OK", "results": [
            {"name": "Good", "geometry": {"location": {"lat": 1.0, "lng": 2.0}}},
            {"name": "NullLat", "geometry": {"location": {"lat": null, "lng": 2.0}}},
            {"name": "NoGeometry"}
        ]}"#;
        let body: NearbyResponse = serde_json::from_str(json).unwrap();
        let markers: Vec<_> = body
            .results
            .into_iter()
            .filter_map(Place::into_marker)
            .collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].label.as_deref(), Some("Good"));
    }
}
