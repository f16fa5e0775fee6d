//! # Screen Controller
//!
//! Owns the `SessionState` and is the only thing that writes it. Background
//! work (location readings, venue fetches, route planning) runs on tokio
//! tasks and reports back as `Action`s over one channel; the controller feeds
//! each through `update()` and runs the returned `Effect`.
//!
//! ```text
//!   tracker task ─┐
//!   fetch tasks  ─┼─► mpsc<Action> ─► step()/drain() ─► update() ─► Effect ─► spawn / notify
//!   route tasks  ─┘                                        │
//!   presentation: edit_destination(), go() ────────────────┘
//!                 snapshot(), take_notifications()  ◄── read-only
//! ```
//!
//! Teardown flips a shared flag, releases the watch, and marks the session
//! torn down. Tasks already in flight finish but check the flag before
//! reporting, and the reducer drops anything that still slips through.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::core::action::{Action, Effect, update};
use crate::core::config::{Credentials, ResolvedConfig};
use crate::core::fanout::VenueSources;
use crate::core::planner::RoutePlanner;
use crate::core::state::{Notification, SessionState, Snapshot};
use crate::geo::{Position, SpanDeltas};
use crate::location::{PositionTracker, WatchGuard};
use crate::services::{DirectionsClient, PlacesProvider, VenueQuery, YelpProvider};

/// Remote collaborators and their knobs.
#[derive(Clone)]
pub struct Services {
    pub venues: VenueSources,
    pub planner: RoutePlanner,
    pub radius_meters: u32,
    pub request_timeout: Duration,
}

impl Services {
    /// Wires the live Yelp, Places and Directions clients.
    pub fn from_config(config: &ResolvedConfig, credentials: &Credentials) -> Self {
        let food = YelpProvider::new(
            credentials.yelp_api_key.clone(),
            Some(config.yelp_base_url.clone()),
            Some(config.food_term.clone()),
        );
        let fuel = PlacesProvider::new(
            credentials.places_api_key.clone(),
            Some(config.places_base_url.clone()),
            Some(config.fuel_type.clone()),
        );
        let directions = DirectionsClient::new(
            credentials.directions_api_key.clone(),
            Some(config.directions_base_url.clone()),
        );

        Self {
            venues: VenueSources {
                food: Arc::new(food),
                fuel: Arc::new(fuel),
            },
            planner: RoutePlanner::new(Arc::new(directions), config.request_timeout),
            radius_meters: config.radius_meters,
            request_timeout: config.request_timeout,
        }
    }
}

pub struct ScreenController {
    state: SessionState,
    services: Arc<Services>,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    torn_down: Arc<AtomicBool>,
    watch: Option<WatchGuard>,
    notifications: VecDeque<Notification>,
    /// Spawned tasks whose result action has not been processed yet.
    in_flight: usize,
}

impl ScreenController {
    pub fn new(services: Services, deltas: SpanDeltas) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state: SessionState::new(deltas),
            services: Arc::new(services),
            tx,
            rx,
            torn_down: Arc::new(AtomicBool::new(false)),
            watch: None,
            notifications: VecDeque::new(),
            in_flight: 0,
        }
    }

    /// Requests the one-shot startup fix and starts the continuous watch.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, tracker: PositionTracker) {
        let tracker = Arc::new(tracker);
        self.watch = Some(tracker.watch(self.tx.clone()));

        let tx = self.tx.clone();
        let torn_down = self.torn_down.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = tracker.current_position().await;
            if torn_down.load(Ordering::Acquire) {
                debug!("Initial fix arrived after teardown, dropping");
                return;
            }
            if tx.send(Action::InitialFix(result)).is_err() {
                warn!("Failed to send initial fix: receiver dropped");
            }
        });
    }

    /// Destination text changed. Nothing else happens until `go()`.
    pub fn edit_destination(&mut self, text: impl Into<String>) {
        self.dispatch(Action::DestinationEdited(text.into()));
    }

    /// Plans a route from the current marker to the destination text.
    pub fn go(&mut self) {
        self.dispatch(Action::Go);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Blocking notifications raised since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// True once the watch has ended (or was never started) and every
    /// spawned task has reported back.
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && !self.watch.as_ref().is_some_and(|w| w.is_active())
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.torn_down
    }

    /// Applies one action and runs its effect.
    pub fn dispatch(&mut self, action: Action) {
        if matches!(
            action,
            Action::InitialFix(_)
                | Action::VenuesFetched { .. }
                | Action::RouteReady { .. }
                | Action::RouteFailed { .. }
        ) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        if matches!(action, Action::WatchEnded) {
            self.watch = None;
        }

        let effect = update(&mut self.state, action);
        self.run_effect(effect);
    }

    /// Waits for the next background action and applies it.
    pub async fn step(&mut self) {
        if let Some(action) = self.rx.recv().await {
            self.dispatch(action);
        }
    }

    /// Applies every action already queued without waiting. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
            count += 1;
        }
        count
    }

    /// Stops the watch and freezes the session. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.state.torn_down {
            return;
        }
        info!("Tearing down map session");
        self.torn_down.store(true, Ordering::Release);
        self.watch = None;
        // Tasks still running will drop their results instead of reporting back.
        self.in_flight = 0;
        self.dispatch(Action::TornDown);
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::FetchVenues { cycle, position } => self.spawn_fetch(cycle, position),
            Effect::PlanRoute {
                request,
                origin,
                destination,
            } => self.spawn_route(request, origin, destination),
            Effect::Notify(notification) => {
                info!("{}: {}", notification.title(), notification.message);
                self.notifications.push_back(notification);
            }
        }
    }

    fn spawn_fetch(&mut self, cycle: u64, position: Position) {
        debug!("Spawning venue fetch for cycle {}", cycle);
        let services = self.services.clone();
        let tx = self.tx.clone();
        let torn_down = self.torn_down.clone();
        let query = VenueQuery {
            position,
            radius_meters: services.radius_meters,
        };

        self.in_flight += 1;
        tokio::spawn(async move {
            let batch = services
                .venues
                .fetch_all(query, services.request_timeout)
                .await;
            if torn_down.load(Ordering::Acquire) {
                debug!("Venue cycle {} finished after teardown, dropping", cycle);
                return;
            }
            let action = Action::VenuesFetched {
                cycle,
                food: batch.food,
                fuel: batch.fuel,
            };
            if tx.send(action).is_err() {
                warn!("Failed to send venues for cycle {}: receiver dropped", cycle);
            }
        });
    }

    fn spawn_route(&mut self, request: u64, origin: Position, destination: String) {
        debug!("Spawning route request {}", request);
        let planner = self.services.planner.clone();
        let tx = self.tx.clone();
        let torn_down = self.torn_down.clone();

        self.in_flight += 1;
        tokio::spawn(async move {
            let action = match planner.plan_route(origin, &destination).await {
                Ok(route) => Action::RouteReady { request, route },
                Err(error) => Action::RouteFailed { request, error },
            };
            if torn_down.load(Ordering::Acquire) {
                debug!("Route request {} finished after teardown, dropping", request);
                return;
            }
            if tx.send(action).is_err() {
                warn!("Failed to send route for request {}: receiver dropped", request);
            }
        });
    }
}

impl Drop for ScreenController {
    fn drop(&mut self) {
        self.teardown();
    }
}
