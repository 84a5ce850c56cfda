//! Assistant Theme - Visual Design System
//!
//! Blue/indigo palette with green "AI generated" accents.

use ratatui::style::{Color, Modifier, Style};

pub struct AssistantTheme {
    // Primary palette
    pub royal_blue: Color,
    pub indigo: Color,
    pub sky: Color,
    pub paper: Color,

    // Status colors
    pub success_green: Color,
    pub warning_amber: Color,
    pub error_red: Color,

    // Neutrals
    pub slate: Color,
    pub muted: Color,
}

impl Default for AssistantTheme {
    fn default() -> Self {
        Self {
            royal_blue: Color::Rgb(29, 78, 216), // #1D4ED8
            indigo: Color::Rgb(55, 48, 163),     // #3730A3
            sky: Color::Rgb(147, 197, 253),      // #93C5FD
            paper: Color::Rgb(243, 244, 246),    // #F3F4F6

            success_green: Color::Rgb(22, 163, 74), // #16A34A
            warning_amber: Color::Rgb(217, 119, 6), // #D97706
            error_red: Color::Rgb(220, 38, 38),     // #DC2626

            slate: Color::Rgb(75, 85, 99),     // #4B5563
            muted: Color::Rgb(156, 163, 175),  // #9CA3AF
        }
    }
}

impl AssistantTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.paper)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.sky)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.sky)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.royal_blue)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success_green)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning_amber)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error_red)
            .add_modifier(Modifier::BOLD)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Borders
    // ─────────────────────────────────────────────────────────────────────

    pub fn panel_border(&self) -> Style {
        Style::default().fg(self.slate)
    }

    pub fn header_border(&self) -> Style {
        Style::default()
            .fg(self.indigo)
            .add_modifier(Modifier::BOLD)
    }

    /// Submit control: bright when enabled, washed out while a request runs
    pub fn submit_button(&self, disabled: bool) -> Style {
        if disabled {
            Style::default().fg(self.muted).add_modifier(Modifier::DIM)
        } else {
            Style::default()
                .fg(self.paper)
                .bg(self.royal_blue)
                .add_modifier(Modifier::BOLD)
        }
    }
}

/// UI Icons used throughout the TUI
pub mod icons {
    pub const HINT: &str = "💡";
    pub const ANSWER: &str = "◉";
    pub const SOURCE: &str = "▣";
    pub const ERROR: &str = "✗";
    pub const EXPANDED: &str = "▴";
    pub const COLLAPSED: &str = "▾";
    pub const CURSOR: char = '▏';
}
