//! Spinner Widget
//!
//! Shown next to the submit control while a request is in flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

pub const BRAILLE_SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct Spinner {
    /// Frame counter, advanced once per tick
    frame: u64,
    color: Color,
}

impl Spinner {
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            color: Color::Cyan,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn current_char(&self) -> char {
        let idx = (self.frame / 6 % BRAILLE_SPINNER.len() as u64) as usize;
        BRAILLE_SPINNER[idx]
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_string(
            area.x,
            area.y,
            self.current_char().to_string(),
            Style::default().fg(self.color),
        );
    }
}
