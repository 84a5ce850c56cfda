//! TUI Widgets - UI Components
//!
//! Stateless renderers. Business logic stays in [`crate::panel`].

mod spinner;

pub use spinner::Spinner;

/// Common widget utilities
pub mod utils {
    /// Truncate on character boundaries with an ellipsis
    pub fn truncate(s: &str, max_len: usize) -> String {
        let count = s.chars().count();
        if count <= max_len {
            s.to_string()
        } else if max_len <= 3 {
            s.chars().take(max_len).collect()
        } else {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{}...", head)
        }
    }
}
