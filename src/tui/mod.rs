//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the map screen,
//! and translates keyboard events into `ScreenController` calls.
//!
//! This is the only module that knows about ratatui and crossterm. It reads
//! the session through `snapshot()` and never writes state directly.
//!
//! ## Loop
//!
//! Each pass drains whatever the background tasks have reported, moves new
//! notifications into the alert queue, redraws if anything changed, then
//! polls the keyboard for up to 100ms. Location and venue updates land
//! within one poll interval without any key being pressed.
//!
//! | Key       | Effect                                     |
//! |-----------|--------------------------------------------|
//! | typing    | edit destination                           |
//! | Enter     | plan route (or dismiss the open alert)     |
//! | Tab       | highlight next venue                       |
//! | Esc       | dismiss alert, otherwise leave the screen  |
//! | Ctrl+C    | leave the screen                           |

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::collections::VecDeque;
use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::core::{Notification, ScreenController, Snapshot};
use crate::tui::component::EventHandler;
use crate::tui::components::{DestinationBox, DestinationEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// TUI-specific presentation state (not part of the session)
pub struct TuiState {
    pub destination_box: DestinationBox,
    /// Index into food-then-fuel of the highlighted venue
    pub selected: Option<usize>,
    /// Blocking notifications, shown one at a time
    pub alerts: VecDeque<Notification>,
    /// A destination given on the command line waits for the first fix
    pub pending_go: bool,
}

impl TuiState {
    pub fn new(destination: Option<String>) -> Self {
        Self {
            pending_go: destination.as_deref().is_some_and(|d| !d.trim().is_empty()),
            destination_box: DestinationBox::new(destination),
            selected: None,
            alerts: VecDeque::new(),
        }
    }

    /// Moves the highlight to the next venue, wrapping around.
    pub fn next_venue(&mut self, venue_count: usize) {
        self.selected = match (self.selected, venue_count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), n) => Some((i + 1) % n),
        };
    }

    /// Keeps the highlight valid after the venue lists were replaced.
    pub fn clamp_selection(&mut self, venue_count: usize) {
        if self.selected.is_some_and(|i| i >= venue_count) {
            self.selected = None;
        }
    }
}

/// What the loop should do after a key.
#[derive(Debug, PartialEq)]
enum Outcome {
    Continue,
    Quit,
}

fn handle_event(
    event: TuiEvent,
    tui: &mut TuiState,
    controller: &mut ScreenController,
    snapshot: &Snapshot,
) -> Outcome {
    match event {
        TuiEvent::ForceQuit => return Outcome::Quit,
        TuiEvent::Resize => {}
        // An open alert swallows input until dismissed
        TuiEvent::Submit | TuiEvent::Quit if !tui.alerts.is_empty() => {
            tui.alerts.pop_front();
        }
        _ if !tui.alerts.is_empty() => {}
        TuiEvent::Quit => return Outcome::Quit,
        TuiEvent::NextVenue => tui.next_venue(snapshot.food.len() + snapshot.fuel.len()),
        other => match tui.destination_box.handle_event(&other) {
            Some(DestinationEvent::Edited(text)) => controller.edit_destination(text),
            Some(DestinationEvent::Go) => {
                tui.pending_go = false;
                controller.go();
            }
            None => {}
        },
    }
    Outcome::Continue
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,                        // Show cursor for destination editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, Hide);
    }
}

/// Runs the map screen until the user leaves, then tears the session down.
pub fn run(mut controller: ScreenController, destination: Option<String>) -> std::io::Result<()> {
    if let Some(text) = &destination {
        controller.edit_destination(text.clone());
    }
    let mut tui = TuiState::new(destination);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let result = event_loop(&mut terminal, &mut controller, &mut tui);

    controller.teardown();
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    controller: &mut ScreenController,
    tui: &mut TuiState,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        // Background results first, so the frame shows the latest session
        if controller.drain() > 0 {
            needs_redraw = true;
        }
        let notifications = controller.take_notifications();
        if !notifications.is_empty() {
            needs_redraw = true;
            tui.alerts.extend(notifications);
        }

        let mut snapshot = controller.snapshot();
        if tui.pending_go && snapshot.marker.is_some() {
            debug!("First fix arrived, planning route to command-line destination");
            tui.pending_go = false;
            controller.go();
            snapshot = controller.snapshot();
        }
        tui.clamp_selection(snapshot.food.len() + snapshot.fuel.len());

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &snapshot, tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(POLL_INTERVAL)?;
        if first_event.is_none() {
            continue;
        }
        needs_redraw = true;

        // Process first event + drain ALL pending events before next draw
        let mut pending = first_event;
        while let Some(event) = pending {
            if handle_event(event, tui, controller, &snapshot) == Outcome::Quit {
                info!("Leaving map screen");
                return Ok(());
            }
            pending = poll_event_immediate()?;
        }
    }
}
