//! Knowledge Assistant - terminal front-end for document Q&A
//!
//! A question goes through one [`QueryPanel`] request cycle against a
//! [`QueryTransport`]: the real HTTP endpoint, or the offline mock.

pub mod api;
pub mod config;
pub mod error;
pub mod panel;
pub mod render;
pub mod transport;
pub mod tui;

pub use api::{QueryRequest, QueryResponse, SourceCitation};
pub use config::AssistantConfig;
pub use error::{AssistantError, EndpointFailure, FixSuggestion};
pub use panel::{QueryPanel, RequestStatus, ResultPolicy, Ticket};
pub use transport::{create_transport, HttpTransport, MockTransport, QueryTransport, TransportKind};
