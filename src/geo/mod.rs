//! # Geographic Primitives
//!
//! Plain data shared by every other module: validated positions, map
//! viewports, venue markers, and routes. Also home to the polyline codec
//! that turns a directions provider's compact path string into a `Route`.

pub mod polyline;
pub mod types;

pub use polyline::DecodeError;
pub use types::{Category, InvalidPosition, Position, Region, Route, SpanDeltas, VenueMarker};
