//! # AlertPopup Component
//!
//! Centered modal for a blocking notification. The map keeps updating
//! underneath; only keyboard input is held until Enter or Esc dismisses it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::Notification;
use crate::tui::component::Component;

pub struct AlertPopup<'a> {
    pub notification: &'a Notification,
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

impl Component for AlertPopup<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(4).clamp(10, 60);
        let paragraph = Paragraph::new(self.notification.message.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::Red))
                    .title(self.notification.title())
                    .title_bottom("Enter/Esc: dismiss"),
            );
        let height = (paragraph.line_count(width.saturating_sub(2)) as u16 + 2).min(area.height);
        let popup = centered(area, width, height);

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}
