use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::Snapshot;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{AlertPopup, MapView, TitleBar};

pub fn draw_ui(frame: &mut Frame, snapshot: &Snapshot, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(3)]);
    let [title_area, map_area, input_area] = layout.areas(frame.area());

    let selected = tui
        .selected
        .and_then(|index| snapshot.food.iter().chain(snapshot.fuel.iter()).nth(index))
        .map(TitleBar::describe);

    TitleBar {
        tracking: snapshot.tracking,
        position: snapshot.marker,
        food_count: snapshot.food.len(),
        fuel_count: snapshot.fuel.len(),
        selected,
    }
    .render(frame, title_area);

    MapView::new(snapshot, tui.selected).render(frame, map_area);

    tui.destination_box.dimmed = !tui.alerts.is_empty();
    tui.destination_box.render(frame, input_area);

    if let Some(notification) = tui.alerts.front() {
        AlertPopup { notification }.render(frame, frame.area());
    }
}
