//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: tracking state, position, and layer counts
//! - `MapView`: the canvas with route, venues, and the user marker
//! - `AlertPopup`: modal for blocking notifications
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `DestinationBox`: the "Where to?" field
//!
//! Components receive external data as props, never by reaching into the
//! controller. The only way back into core is through the events they emit.

pub mod alert;
pub mod destination_box;
pub mod map_view;
pub mod title_bar;

pub use alert::AlertPopup;
pub use destination_box::{DestinationBox, DestinationEvent};
pub use map_view::MapView;
pub use title_bar::TitleBar;
