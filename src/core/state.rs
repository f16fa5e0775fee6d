//! # Session State
//!
//! Everything the map screen shows, owned by one writer.
//!
//! ```text
//! SessionState
//! ├── deltas: SpanDeltas          // fixed viewport span
//! ├── viewport: Viewport          // group 1: region + user marker
//! ├── venues: Venues              // group 2: food + fuel lists, tagged by fetch cycle
//! ├── route: RouteSlot            // group 3: decoded route, tagged by request
//! ├── destination: String         // user-edited text, inert until "go"
//! ├── next_cycle / next_request   // sequence counters
//! ├── tracking: bool              // watch is delivering updates
//! └── torn_down: bool             // screen is gone, ignore late results
//! ```
//!
//! Each group is replaced by a single assignment in `update()` (action.rs), so a
//! snapshot taken between two actions never sees half of a group.

use std::fmt;

use serde::Serialize;

use crate::geo::{Position, Region, Route, SpanDeltas, VenueMarker};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Viewport {
    pub region: Region,
    /// `None` until the first fix arrives.
    pub marker: Option<Position>,
}

impl Viewport {
    pub fn centered(position: Position, deltas: SpanDeltas) -> Self {
        Self {
            region: Region::centered(position, deltas),
            marker: Some(position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Venues {
    /// Fetch cycle these lists came from. 0 = never fetched.
    pub cycle: u64,
    pub food: Vec<VenueMarker>,
    pub fuel: Vec<VenueMarker>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteSlot {
    /// Route request this path answers. 0 = no route yet.
    pub request: u64,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub deltas: SpanDeltas,
    pub viewport: Viewport,
    pub venues: Venues,
    pub route: RouteSlot,
    pub destination: String,
    pub next_cycle: u64,
    pub next_request: u64,
    pub watch_updates: u64,
    pub tracking: bool,
    pub torn_down: bool,
}

impl SessionState {
    pub fn new(deltas: SpanDeltas) -> Self {
        Self {
            deltas,
            viewport: Viewport::default(),
            venues: Venues::default(),
            route: RouteSlot::default(),
            destination: String::new(),
            next_cycle: 0,
            next_request: 0,
            watch_updates: 0,
            tracking: false,
            torn_down: false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            region: self.viewport.region,
            marker: self.viewport.marker,
            food: self.venues.food.clone(),
            fuel: self.venues.fuel.clone(),
            destination: self.destination.clone(),
            route: self.route.route.clone(),
            tracking: self.tracking,
        }
    }
}

/// Read-only copy of the session for the presentation layer.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub region: Region,
    pub marker: Option<Position>,
    pub food: Vec<VenueMarker>,
    pub fuel: Vec<VenueMarker>,
    pub destination: String,
    pub route: Route,
    pub tracking: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    LocationUnavailable,
    RouteRequestFailed,
}

/// A blocking, user-visible failure. Background failures are only logged.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn location_unavailable(error: &impl fmt::Display) -> Self {
        Self {
            kind: NotificationKind::LocationUnavailable,
            message: error.to_string(),
        }
    }

    pub fn route_failed(error: &impl fmt::Display) -> Self {
        Self {
            kind: NotificationKind::RouteRequestFailed,
            message: error.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NotificationKind::LocationUnavailable => "Location unavailable",
            NotificationKind::RouteRequestFailed => "Route request failed",
        }
    }
}
