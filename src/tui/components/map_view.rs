//! # MapView Component
//!
//! Draws the visible region on a braille canvas:
//!
//! ```text
//! ┌Map──────────────────────┐
//! │      F         ⠤⠤⠒⠒⠉    │   F = food venue
//! │   ⠤⠤⠒⠒@⠉⠉               │   G = fuel venue
//! │        G                │   @ = user marker
//! └─────────────────────────┘   braille line = route
//! ```
//!
//! Canvas x is longitude and y is latitude, so the region's deltas map
//! straight onto the canvas bounds. The route is clipped by the canvas, not
//! by us.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::Snapshot;
use crate::geo::{Category, VenueMarker};
use crate::tui::component::Component;

pub struct MapView<'a> {
    pub snapshot: &'a Snapshot,
    /// Index into food-then-fuel of the venue to highlight
    pub selected: Option<usize>,
}

impl<'a> MapView<'a> {
    pub fn new(snapshot: &'a Snapshot, selected: Option<usize>) -> Self {
        Self { snapshot, selected }
    }

    fn venues(&self) -> impl Iterator<Item = &'a VenueMarker> + 'a {
        self.snapshot.food.iter().chain(self.snapshot.fuel.iter())
    }
}

fn glyph(category: Category) -> (&'static str, Color) {
    match category {
        Category::Food => ("F", Color::Yellow),
        Category::Fuel => ("G", Color::Cyan),
    }
}

impl Component for MapView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Map");

        let region = self.snapshot.region;
        if region.latitude_delta == 0.0 || region.longitude_delta == 0.0 {
            let waiting = Paragraph::new("Waiting for location...")
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(waiting, area);
            return;
        }

        let snapshot = self.snapshot;
        let selected = self.selected;
        let venues: Vec<&VenueMarker> = self.venues().collect();

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(region.x_bounds())
            .y_bounds(region.y_bounds())
            .paint(move |ctx| {
                for pair in snapshot.route.points.windows(2) {
                    ctx.draw(&CanvasLine::new(
                        pair[0].longitude,
                        pair[0].latitude,
                        pair[1].longitude,
                        pair[1].latitude,
                        Color::Magenta,
                    ));
                }
                ctx.layer();

                for (index, venue) in venues.iter().enumerate() {
                    let (symbol, color) = glyph(venue.category);
                    let mut span = Span::styled(symbol, Style::default().fg(color));
                    if selected == Some(index) {
                        span = span.reversed().bold();
                    }
                    ctx.print(venue.position.longitude, venue.position.latitude, span);
                }

                if let Some(marker) = snapshot.marker {
                    ctx.print(marker.longitude, marker.latitude, "@".red().bold());
                }
            });

        frame.render_widget(canvas, area);
    }
}
