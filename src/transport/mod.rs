//! # Transport Layer
//!
//! The single request interface the query panel talks through.
//!
//! - [`QueryTransport`] - async trait every backend implements
//! - [`HttpTransport`] - talks to the real endpoint over HTTP
//! - [`MockTransport`] - offline mode: canned answer after a fixed delay
//!
//! ## Selecting a transport
//!
//! ```rust
//! use knowledge_assistant::config::AssistantConfig;
//! use knowledge_assistant::transport::{create_transport, TransportKind};
//!
//! let mut config = AssistantConfig::default();
//! config.transport = TransportKind::Mock;
//!
//! let transport = create_transport(&config).unwrap();
//! assert_eq!(transport.name(), "mock");
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{canned_response, MockTransport, CANNED_ANSWER};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{DocumentInfo, HealthStatus, QueryRequest, QueryResponse, UploadReceipt};
use crate::config::AssistantConfig;
use crate::error::{AssistantError, EndpointFailure, Result};

// ============================================================================
// TRANSPORT TRAIT
// ============================================================================

#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Short name used in logs and `config` output
    fn name(&self) -> &str;

    /// Issue exactly one question request.
    ///
    /// Every failure mode is folded into [`EndpointFailure`].
    async fn query(&self, request: &QueryRequest) -> std::result::Result<QueryResponse, EndpointFailure>;

    /// Backend liveness and index state
    async fn health(&self) -> Result<HealthStatus>;

    /// Documents the backend knows about
    async fn documents(&self) -> Result<Vec<DocumentInfo>>;

    /// Send a document to the backend's data directory
    async fn upload(&self, path: &Path) -> Result<UploadReceipt>;
}

// ============================================================================
// TRANSPORT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    Mock,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "mock" | "offline" => Ok(Self::Mock),
            other => Err(AssistantError::Config {
                reason: format!("Unknown transport: '{}'. Available: http, mock", other),
            }),
        }
    }
}

// ============================================================================
// TRANSPORT FACTORY
// ============================================================================

/// Build the transport the config asks for
pub fn create_transport(config: &AssistantConfig) -> Result<Box<dyn QueryTransport>> {
    match config.transport {
        TransportKind::Http => Ok(Box::new(HttpTransport::new(&config.endpoint)?)),
        TransportKind::Mock => Ok(Box::new(MockTransport::new().with_delay(config.mock_delay()))),
    }
}
