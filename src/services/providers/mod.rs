pub mod directions;
pub mod places;
pub mod yelp;

pub use directions::DirectionsClient;
pub use places::PlacesProvider;
pub use yelp::YelpProvider;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::services::ProviderError;

/// Turns a non-2xx response into `ProviderError::Api`, otherwise parses the JSON body.
async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    debug!("{} response status: {}", provider, status);

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("{} API error: {} - {}", provider, status.as_u16(), body);
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
}
