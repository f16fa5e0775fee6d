use std::fmt;

use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
///
/// Construct through [`Position::new`] when the values come from outside the
/// crate (device fixes, provider payloads) so they are checked once at the
/// boundary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Rejected coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for InvalidPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid coordinates ({}, {})",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidPosition {}

impl Position {
    /// Returns a position if both values are finite and inside the valid
    /// latitude/longitude ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidPosition> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Self { latitude, longitude })
        } else {
            Err(InvalidPosition { latitude, longitude })
        }
    }

    /// `"lat,lon"` as used in provider query strings.
    pub fn to_query_value(self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Angular span of the map viewport.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpanDeltas {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl SpanDeltas {
    /// Longitude span follows the screen's aspect ratio (width / height).
    pub fn from_aspect_ratio(latitude_delta: f64, aspect_ratio: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta: latitude_delta * aspect_ratio,
        }
    }
}

/// A map viewport: a center plus a span.
///
/// `Region::default()` is the zero-state shown before any fix arrives.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn centered(position: Position, deltas: SpanDeltas) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            latitude_delta: deltas.latitude_delta,
            longitude_delta: deltas.longitude_delta,
        }
    }

    pub fn center(&self) -> Position {
        Position {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// `(min, max)` longitude bounds, i.e. the x axis of a plot.
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.longitude_delta / 2.0;
        [self.longitude - half, self.longitude + half]
    }

    /// `(min, max)` latitude bounds, i.e. the y axis of a plot.
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.latitude_delta / 2.0;
        [self.latitude - half, self.latitude + half]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Fuel,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Fuel => "Fuel",
        }
    }
}

/// A renderable point of interest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VenueMarker {
    pub position: Position,
    pub category: Category,
    pub label: Option<String>,
    pub price_info: Option<String>,
}

/// Ordered path from origin to destination. Empty means "no route yet".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Route {
    pub points: Vec<Position>,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl From<Vec<(f64, f64)>> for Route {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        Self {
            points: pairs
                .into_iter()
                .map(|(latitude, longitude)| Position {
                    latitude,
                    longitude,
                })
                .collect(),
        }
    }
}
