pub mod provider;
pub mod providers;

pub use provider::{DirectionsProvider, ProviderError, VenueProvider, VenueQuery};
pub use providers::{DirectionsClient, PlacesProvider, YelpProvider};
