//! Wire types for the assistant HTTP endpoint
//!
//! Mirrors the JSON the backend speaks under `/api`. Optional fields the
//! backend may add are parsed when present and never required.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AssistantError, Result};

/// Path of the question endpoint, relative to the base URL
pub const QUERY_PATH: &str = "api/query";
pub const HEALTH_PATH: &str = "api/health";
pub const DOCUMENTS_PATH: &str = "api/documents";
pub const UPLOAD_PATH: &str = "api/upload";

/// File extensions the backend accepts for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "md", "html", "csv", "json", "docx"];

// ============================================================================
// QUERY
// ============================================================================

/// Body of `POST /api/query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Successful answer payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,

    /// Ordered by relevance as the backend decided; missing or null means none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<SourceCitation>,

    /// Server-side processing time, e.g. "1.42s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_time: Option<String>,
}

impl QueryResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..Self::default()
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceCitation>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_query_time(mut self, query_time: impl Into<String>) -> Self {
        self.query_time = Some(query_time.into());
        self
    }
}

/// A supporting snippet and the document it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub file_name: String,
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl SourceCitation {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
            score: None,
            document_id: None,
            metadata: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Human label for the relevance column
    pub fn relevance_label(&self) -> String {
        match self.score {
            Some(score) => format!("{:.2}", score),
            None => "High".to_string(),
        }
    }
}

/// Body of a non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the `error` field from a raw body, if it is JSON and has one
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// AUXILIARY ENDPOINTS
// ============================================================================

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,

    #[serde(rename = "indexStatus", default)]
    pub index_status: String,

    /// Whether the backend has any documents to answer from
    #[serde(default)]
    pub documents: bool,

    #[serde(default)]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// One entry of `GET /api/documents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,

    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub last_modified: String,

    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub documents: Vec<DocumentInfo>,
}

/// Reply to `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Reject a file the backend would refuse anyway, before anything is sent
pub fn check_upload_extension(path: &Path) -> Result<()> {
    let extension = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(AssistantError::UnsupportedFileType { extension })
    }
}
