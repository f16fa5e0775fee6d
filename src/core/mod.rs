//! # Core Application Logic
//!
//! This module contains the map screen's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (session)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Controller (effects) │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Headless  │      │   Mobile   │
//!     │  Adapter   │      │   (JSON)   │      │  (future)  │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `SessionState` and the read-only `Snapshot`
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`controller`]: Owns the state, runs effects on tokio tasks
//! - [`fanout`]: Concurrent food + fuel fetch
//! - [`planner`]: Destination text → decoded route
//! - [`config`]: Layered settings and credentials

pub mod action;
pub mod config;
pub mod controller;
pub mod fanout;
pub mod planner;
pub mod state;

pub use controller::{ScreenController, Services};
pub use state::{Notification, Snapshot};
