//! TUI Module - interactive query panel
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     UI LAYER (app.rs, widgets/)                     │
//! │  Pure rendering of the panel. Keys → Actions.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ QueryPanel selectors
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      DOMAIN LAYER (crate::panel)                    │
//! │  submit() → Ticket, resolve(Ticket, outcome).                       │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Completion over mpsc
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  CONNECTOR LAYER (crate::transport)                 │
//! │  QueryTransport trait. HttpTransport + MockTransport.               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod theme;

pub mod widgets;

pub use app::TuiApp;
pub use events::Action;
pub use theme::AssistantTheme;

use std::sync::Arc;

use crate::panel::ResultPolicy;
use crate::transport::QueryTransport;

/// Run the interactive panel until the user quits
pub async fn run(transport: Arc<dyn QueryTransport>, policy: ResultPolicy) -> anyhow::Result<()> {
    TuiApp::new(transport, policy).run().await
}
