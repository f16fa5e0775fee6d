//! # DestinationBox Component
//!
//! Single-line "Where to?" field. Every edit is reported so the controller's
//! destination stays in sync; Enter asks for a route. Unlike a chat input the
//! text is kept after submit, so the same destination can be re-planned.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PLACEHOLDER: &str = "Where to?";

#[derive(Debug, Clone, PartialEq)]
pub enum DestinationEvent {
    Edited(String),
    Go,
}

#[derive(Debug, Default)]
pub struct DestinationBox {
    pub buffer: String,
    /// Dim the box while a modal is open (Prop)
    pub dimmed: bool,
}

impl DestinationBox {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            buffer: initial.unwrap_or_default(),
            dimmed: false,
        }
    }
}

impl Component for DestinationBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Destination (Enter: go)");

        let (text, style) = if self.buffer.is_empty() {
            (PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            (self.buffer.as_str(), Style::default().fg(Color::Green))
        };
        let style = if self.dimmed { style.fg(Color::DarkGray) } else { style };

        frame.render_widget(Paragraph::new(text).block(block).style(style), area);

        if !self.dimmed {
            let width = self.buffer.chars().count() as u16;
            let x = (area.x + 1 + width).min(area.right().saturating_sub(2));
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl EventHandler for DestinationBox {
    type Event = DestinationEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                Some(DestinationEvent::Edited(self.buffer.clone()))
            }
            TuiEvent::Paste(text) => {
                // Single line: pasted newlines become spaces.
                self.buffer.extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
                Some(DestinationEvent::Edited(self.buffer.clone()))
            }
            TuiEvent::Backspace => self
                .buffer
                .pop()
                .map(|_| DestinationEvent::Edited(self.buffer.clone())),
            TuiEvent::Submit => Some(DestinationEvent::Go),
            _ => None,
        }
    }
}
