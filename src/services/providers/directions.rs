//! Google Directions, used by the route planner.
//!
//! `GET {base}/json?origin=lat,lon&destination=..&key=..`
//!
//! The destination arrives already normalized (words form-encoded and joined
//! with `+`), so the query string is assembled by hand instead of through
//! `RequestBuilder::query`, which would escape the `+` separators.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use url::{Url, form_urlencoded};

use crate::geo::Position;
use crate::services::providers::read_json;
use crate::services::{DirectionsProvider, ProviderError};

pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions";

#[derive(Deserialize, Debug)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
}

#[derive(Deserialize, Debug)]
struct OverviewPolyline {
    points: String,
}

pub struct DirectionsClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_DIRECTIONS_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self, origin: Position, destination: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}/json", self.base_url))
            .map_err(|e| ProviderError::Config(format!("bad directions URL: {e}")))?;
        let key: String = form_urlencoded::byte_serialize(self.api_key.as_bytes()).collect();
        url.set_query(Some(&format!(
            "origin={}&destination={}&key={}",
            origin.to_query_value(),
            destination,
            key
        )));
        Ok(url)
    }
}

#[async_trait]
impl DirectionsProvider for DirectionsClient {
    fn name(&self) -> &str {
        "directions"
    }

    async fn overview_paths(
        &self,
        origin: Position,
        destination: &str,
    ) -> Result<Vec<String>, ProviderError> {
        info!(
            "Directions request: origin={}, destination={}",
            origin.to_query_value(),
            destination
        );

        let url = self.request_url(origin, destination)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body: DirectionsResponse = read_json(self.name(), response).await?;
        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => {
                debug!("Directions found no route ({})", body.status);
                return Ok(Vec::new());
            }
            _ => {
                warn!("Directions status {}: {:?}", body.status, body.error_message);
                return Err(ProviderError::Status {
                    status: body.status,
                    message: body.error_message,
                });
            }
        }

        debug!("Directions returned {} routes", body.routes.len());
        Ok(body
            .routes
            .into_iter()
            .map(|route| route.overview_polyline.points)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_keeps_plus_separators() {
        let client = DirectionsClient::new("k&y".to_string(), Some("http://localhost:9".to_string()));
        let url = client
            .request_url(Position::new(37.5, -122.25).unwrap(), "San+Francisco+CA")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9/json?origin=37.5,-122.25&destination=San+Francisco+CA&key=k%26y"
        );
    }

    #[test]
    fn test_request_url_rejects_garbage_base() {
        let client = DirectionsClient::new("key".to_string(), Some("not a url".to_string()));
        let err = client
            .request_url(Position::default(), "x")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }

    #[test]
    fn test_route_shape_parses() {
        let json = r#"{"status": "OK", "routes": [{"overview_polyline": {"points": "_p~iF~ps|U"}}]}"#;
        let body: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.routes[0].overview_polyline.points, "_p~iF~ps|U");
    }
}
