//! # Actions
//!
//! Everything that can happen to the map screen becomes an `Action`.
//! A new fix from the watch? That's `Action::PositionUpdated(position)`.
//! User presses Go? That's `Action::Go`.
//!
//! `update()` applies an action to the session and returns the `Effect` the
//! controller must run next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::planner::{RouteError, normalize_destination};
use crate::core::state::{Notification, RouteSlot, SessionState, Venues, Viewport};
use crate::geo::{Position, Route, VenueMarker};
use crate::location::LocationError;

#[derive(Debug)]
pub enum Action {
    /// Result of the one-shot startup reading.
    InitialFix(Result<Position, LocationError>),
    /// A validated reading from the watch.
    PositionUpdated(Position),
    /// A watch reading that could not be used. The watch keeps running.
    WatchFailed(LocationError),
    /// The source closed the watch.
    WatchEnded,
    /// Both providers settled for `cycle`. A failed provider contributes an empty list.
    VenuesFetched {
        cycle: u64,
        food: Vec<VenueMarker>,
        fuel: Vec<VenueMarker>,
    },
    DestinationEdited(String),
    Go,
    RouteReady { request: u64, route: Route },
    RouteFailed { request: u64, error: RouteError },
    TornDown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchVenues { cycle: u64, position: Position },
    PlanRoute {
        request: u64,
        origin: Position,
        destination: String,
    },
    Notify(Notification),
}

pub fn update(state: &mut SessionState, action: Action) -> Effect {
    if state.torn_down {
        debug!("Session torn down, dropping {:?}", action);
        return Effect::None;
    }

    match action {
        Action::InitialFix(Ok(position)) => {
            // A watch update already moved the map; the one-shot reading is older.
            if state.watch_updates == 0 {
                state.viewport = Viewport::centered(position, state.deltas);
            }
            Effect::None
        }
        Action::InitialFix(Err(error)) => {
            warn!("Initial fix failed: {}", error);
            Effect::Notify(Notification::location_unavailable(&error))
        }
        Action::PositionUpdated(position) => {
            state.viewport = Viewport::centered(position, state.deltas);
            state.watch_updates += 1;
            state.tracking = true;
            state.next_cycle += 1;
            Effect::FetchVenues {
                cycle: state.next_cycle,
                position,
            }
        }
        Action::WatchFailed(error) => {
            warn!("Watch reading failed: {}", error);
            Effect::None
        }
        Action::WatchEnded => {
            info!("Location watch ended");
            state.tracking = false;
            Effect::None
        }
        Action::VenuesFetched { cycle, food, fuel } => {
            if cycle <= state.venues.cycle {
                debug!(
                    "Discarding venues from cycle {} (have {})",
                    cycle, state.venues.cycle
                );
                return Effect::None;
            }
            state.venues = Venues { cycle, food, fuel };
            Effect::None
        }
        Action::DestinationEdited(text) => {
            state.destination = text;
            Effect::None
        }
        Action::Go => {
            let Some(origin) = state.viewport.marker else {
                return Effect::Notify(Notification::route_failed(&RouteError::NoOrigin));
            };
            if normalize_destination(&state.destination).is_empty() {
                return Effect::Notify(Notification::route_failed(&RouteError::EmptyDestination));
            }
            state.next_request += 1;
            Effect::PlanRoute {
                request: state.next_request,
                origin,
                destination: state.destination.clone(),
            }
        }
        Action::RouteReady { request, route } => {
            // Only the newest request may move the route, even if it failed.
            if request < state.next_request || request <= state.route.request {
                debug!(
                    "Discarding route for request {} (newest {}, have {})",
                    request, state.next_request, state.route.request
                );
                return Effect::None;
            }
            state.route = RouteSlot { request, route };
            Effect::None
        }
        Action::RouteFailed { request, error } => {
            warn!("Route request {} failed: {}", request, error);
            if request < state.next_request {
                // A newer request is in flight; its outcome is what the user sees.
                return Effect::None;
            }
            Effect::Notify(Notification::route_failed(&error))
        }
        Action::TornDown => {
            state.torn_down = true;
            state.tracking = false;
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::NotificationKind;
    use crate::geo::{Category, SpanDeltas};

    fn state() -> SessionState {
        SessionState::new(SpanDeltas::from_aspect_ratio(0.0922, 0.5))
    }

    fn pos(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude).unwrap()
    }

    fn marker(category: Category) -> VenueMarker {
        VenueMarker {
            position: pos(1.0, 1.0),
            category,
            label: Some("venue".to_string()),
            price_info: None,
        }
    }

    #[test]
    fn test_position_update_moves_viewport_then_requests_fetch() {
        let mut s = state();
        let effect = update(&mut s, Action::PositionUpdated(pos(37.0, -122.0)));

        assert_eq!(s.viewport.marker, Some(pos(37.0, -122.0)));
        assert_eq!(s.viewport.region.latitude, 37.0);
        assert_eq!(s.viewport.region.latitude_delta, 0.0922);
        assert_eq!(s.viewport.region.longitude_delta, 0.0461);
        assert!(s.tracking);
        assert_eq!(
            effect,
            Effect::FetchVenues {
                cycle: 1,
                position: pos(37.0, -122.0)
            }
        );
    }

    #[test]
    fn test_each_update_gets_a_new_cycle() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(1.0, 1.0)));
        let effect = update(&mut s, Action::PositionUpdated(pos(2.0, 2.0)));
        assert!(matches!(effect, Effect::FetchVenues { cycle: 2, .. }));
    }

    #[test]
    fn test_venues_replace_both_lists() {
        let mut s = state();
        update(
            &mut s,
            Action::VenuesFetched {
                cycle: 1,
                food: vec![marker(Category::Food)],
                fuel: vec![marker(Category::Fuel), marker(Category::Fuel)],
            },
        );
        update(
            &mut s,
            Action::VenuesFetched {
                cycle: 2,
                food: vec![marker(Category::Food)],
                fuel: Vec::new(),
            },
        );
        assert_eq!(s.venues.food.len(), 1);
        assert!(s.venues.fuel.is_empty());
        assert_eq!(s.venues.cycle, 2);
    }

    #[test]
    fn test_older_cycle_does_not_overwrite_newer() {
        let mut s = state();
        update(
            &mut s,
            Action::VenuesFetched {
                cycle: 3,
                food: vec![marker(Category::Food)],
                fuel: Vec::new(),
            },
        );
        update(
            &mut s,
            Action::VenuesFetched {
                cycle: 2,
                food: Vec::new(),
                fuel: vec![marker(Category::Fuel)],
            },
        );
        assert_eq!(s.venues.cycle, 3);
        assert_eq!(s.venues.food.len(), 1);
        assert!(s.venues.fuel.is_empty());
    }

    #[test]
    fn test_initial_fix_sets_viewport_without_fetch() {
        let mut s = state();
        let effect = update(&mut s, Action::InitialFix(Ok(pos(10.0, 20.0))));
        assert_eq!(effect, Effect::None);
        assert_eq!(s.viewport.marker, Some(pos(10.0, 20.0)));
    }

    #[test]
    fn test_late_initial_fix_does_not_rewind_map() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(2.0, 2.0)));
        update(&mut s, Action::InitialFix(Ok(pos(1.0, 1.0))));
        assert_eq!(s.viewport.marker, Some(pos(2.0, 2.0)));
    }

    #[test]
    fn test_initial_fix_failure_notifies_and_keeps_zero_region() {
        let mut s = state();
        let effect = update(&mut s, Action::InitialFix(Err(LocationError::PermissionDenied)));
        match effect {
            Effect::Notify(n) => assert_eq!(n.kind, NotificationKind::LocationUnavailable),
            other => panic!("expected notification, got {:?}", other),
        }
        assert_eq!(s.viewport, Viewport::default());
    }

    #[test]
    fn test_watch_failure_is_silent() {
        let mut s = state();
        let effect = update(&mut s, Action::WatchFailed(LocationError::Timeout));
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_destination_edit_has_no_side_effect() {
        let mut s = state();
        let effect = update(&mut s, Action::DestinationEdited("Oakland".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(s.destination, "Oakland");
        assert_eq!(s.next_request, 0);
    }

    #[test]
    fn test_go_requests_route_from_marker() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(37.0, -122.0)));
        update(&mut s, Action::DestinationEdited("San Francisco CA".to_string()));
        let effect = update(&mut s, Action::Go);
        assert_eq!(
            effect,
            Effect::PlanRoute {
                request: 1,
                origin: pos(37.0, -122.0),
                destination: "San Francisco CA".to_string(),
            }
        );
    }

    #[test]
    fn test_go_without_fix_notifies() {
        let mut s = state();
        update(&mut s, Action::DestinationEdited("Oakland".to_string()));
        let effect = update(&mut s, Action::Go);
        match effect {
            Effect::Notify(n) => assert_eq!(n.kind, NotificationKind::RouteRequestFailed),
            other => panic!("expected notification, got {:?}", other),
        }
        assert_eq!(s.next_request, 0);
    }

    #[test]
    fn test_go_with_blank_destination_notifies() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(1.0, 1.0)));
        update(&mut s, Action::DestinationEdited("   ".to_string()));
        assert!(matches!(update(&mut s, Action::Go), Effect::Notify(_)));
    }

    #[test]
    fn test_route_failure_keeps_previous_route() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(1.0, 1.0)));
        update(&mut s, Action::DestinationEdited("A".to_string()));
        update(&mut s, Action::Go);
        let route = Route::from(vec![(1.0, 1.0), (2.0, 2.0)]);
        update(&mut s, Action::RouteReady { request: 1, route: route.clone() });

        update(&mut s, Action::Go);
        let effect = update(
            &mut s,
            Action::RouteFailed {
                request: 2,
                error: RouteError::NoRoutes,
            },
        );
        assert!(matches!(effect, Effect::Notify(_)));
        assert_eq!(s.route.route, route);
    }

    #[test]
    fn test_superseded_route_failure_is_quiet() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(1.0, 1.0)));
        update(&mut s, Action::DestinationEdited("A".to_string()));
        update(&mut s, Action::Go);
        update(&mut s, Action::Go);
        let effect = update(
            &mut s,
            Action::RouteFailed {
                request: 1,
                error: RouteError::NoRoutes,
            },
        );
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_superseded_route_success_after_newer_failure_is_dropped() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(1.0, 1.0)));
        update(&mut s, Action::DestinationEdited("A".to_string()));
        update(&mut s, Action::Go);
        update(&mut s, Action::DestinationEdited("B".to_string()));
        update(&mut s, Action::Go);

        let effect = update(
            &mut s,
            Action::RouteFailed {
                request: 2,
                error: RouteError::NoRoutes,
            },
        );
        assert!(matches!(effect, Effect::Notify(_)));

        let effect = update(
            &mut s,
            Action::RouteReady {
                request: 1,
                route: Route::from(vec![(9.0, 9.0)]),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(s.route.route.is_empty());
        assert_eq!(s.route.request, 0);
    }

    #[test]
    fn test_late_results_after_teardown_are_dropped() {
        let mut s = state();
        update(&mut s, Action::PositionUpdated(pos(1.0, 1.0)));
        update(&mut s, Action::TornDown);
        let before = s.clone();

        update(
            &mut s,
            Action::VenuesFetched {
                cycle: 1,
                food: vec![marker(Category::Food)],
                fuel: vec![marker(Category::Fuel)],
            },
        );
        update(
            &mut s,
            Action::RouteReady {
                request: 1,
                route: Route::from(vec![(1.0, 1.0)]),
            },
        );
        update(&mut s, Action::PositionUpdated(pos(5.0, 5.0)));

        assert_eq!(s, before);
        assert!(!s.tracking);
    }
}
