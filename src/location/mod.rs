//! # Location
//!
//! Device position access. A `LocationSource` supplies raw readings; the
//! `PositionTracker` validates them and feeds the session.

pub mod replay;
pub mod source;
pub mod tracker;

pub use replay::{FixedSource, ReplaySource, TrackPoint};
pub use source::{Fix, LocationError, LocationSource, PositionOptions, Subscription};
pub use tracker::{PositionTracker, WatchGuard};
