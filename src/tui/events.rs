//! Event Handling - Keyboard input processing

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::panel::QueryPanel;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    ToggleSources,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Edit,
    None,
}

/// Map a key to an action, applying text edits to the panel directly.
///
/// Editing stays live while a request runs; only submitting is blocked.
pub fn handle_key_event(key: KeyEvent, panel: &mut QueryPanel) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Action::Quit,

        (_, KeyCode::Enter) => Action::Submit,
        (_, KeyCode::Tab) => Action::ToggleSources,

        (_, KeyCode::Up) => Action::ScrollUp,
        (_, KeyCode::Down) => Action::ScrollDown,
        (_, KeyCode::PageUp) => Action::PageUp,
        (_, KeyCode::PageDown) => Action::PageDown,

        // Clear the line: Ctrl+U
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            panel.set_query(String::new());
            Action::Edit
        }

        (_, KeyCode::Backspace) => {
            let mut query = panel.query().to_string();
            query.pop();
            panel.set_query(query);
            Action::Edit
        }

        (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let mut query = panel.query().to_string();
            query.push(c);
            panel.set_query(query);
            Action::Edit
        }

        _ => Action::None,
    }
}

/// Poll for keyboard events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}
