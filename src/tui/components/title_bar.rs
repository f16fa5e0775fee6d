//! # TitleBar Component
//!
//! Top status line: tracking state, current position, how many venues are
//! on the map, and the venue picked with Tab.
//!
//! Stateless. Everything it shows arrives as props, so the caller decides
//! where the numbers come from (the snapshot, the TUI's own selection).
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     tracking: snapshot.tracking,
//!     position: snapshot.marker,
//!     food_count: snapshot.food.len(),
//!     fuel_count: snapshot.fuel.len(),
//!     selected: Some(venue_summary),
//! };
//! title_bar.render(frame, title_area);
//! ```

use crate::geo::{Position, VenueMarker};
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    pub tracking: bool,
    pub position: Option<Position>,
    pub food_count: usize,
    pub fuel_count: usize,
    /// Summary of the venue highlighted on the map, if any
    pub selected: Option<String>,
}

impl TitleBar {
    /// One-line description of a venue: label, category and price.
    pub fn describe(venue: &VenueMarker) -> String {
        let label = venue.label.as_deref().unwrap_or("(unnamed)");
        match &venue.price_info {
            Some(price) => format!("{} [{}] {}", label, venue.category.label(), price),
            None => format!("{} [{}]", label, venue.category.label()),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let state = if self.tracking { "tracking" } else { "idle" };
        let position = match self.position {
            Some(p) => format!("{:.5}, {:.5}", p.latitude, p.longitude),
            None => "no fix".to_string(),
        };

        let mut title_text = format!(
            "Roadside ({}) | {} | food {} fuel {}",
            state, position, self.food_count, self.fuel_count
        );
        if let Some(selected) = &self.selected {
            title_text.push_str(" | ");
            title_text.push_str(selected);
        }

        frame.render_widget(Span::raw(title_text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Category;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_before_first_fix() {
        let mut title_bar = TitleBar {
            tracking: false,
            position: None,
            food_count: 0,
            fuel_count: 0,
            selected: None,
        };
        let text = rendered(&mut title_bar);
        assert!(text.contains("Roadside (idle)"));
        assert!(text.contains("no fix"));
        assert!(text.contains("food 0 fuel 0"));
    }

    #[test]
    fn test_title_bar_with_selection() {
        let mut title_bar = TitleBar {
            tracking: true,
            position: Some(Position::new(37.78825, -122.4324).unwrap()),
            food_count: 3,
            fuel_count: 2,
            selected: Some("Shell [Fuel] $$".to_string()),
        };
        let text = rendered(&mut title_bar);
        assert!(text.contains("(tracking)"));
        assert!(text.contains("37.78825, -122.43240"));
        assert!(text.contains("food 3 fuel 2"));
        assert!(text.contains("Shell [Fuel] $$"));
    }

    #[test]
    fn test_describe_venue() {
        let venue = VenueMarker {
            position: Position::new(1.0, 1.0).unwrap(),
            category: Category::Food,
            label: Some("Tacos".to_string()),
            price_info: None,
        };
        assert_eq!(TitleBar::describe(&venue), "Tacos [Food]");

        let venue = VenueMarker {
            label: None,
            price_info: Some("$".to_string()),
            ..venue
        };
        assert_eq!(TitleBar::describe(&venue), "(unnamed) [Food] $");
    }
}
