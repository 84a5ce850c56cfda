//! Error types with fix suggestions

use thiserror::Error;

/// Message shown when the endpoint failed without saying why
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Failed to get an answer. The backend may be unreachable.";

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// The single failure class of a request cycle.
///
/// Network errors, non-2xx responses and malformed payloads all collapse
/// into this. `message` carries the server's `error` field when it sent one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", display_message(.message))]
pub struct EndpointFailure {
    pub message: Option<String>,
}

fn display_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(FALLBACK_ERROR_MESSAGE)
}

impl EndpointFailure {
    /// Failure with no server-supplied explanation
    pub fn unreachable() -> Self {
        Self { message: None }
    }

    /// Failure carrying the server's own error text
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The string a user gets to see
    pub fn user_message(&self) -> &str {
        display_message(&self.message)
    }
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Config error: {reason}")]
    Config { reason: String },

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("{0}")]
    Endpoint(#[from] EndpointFailure),

    #[error("Nothing to ask: the question is empty")]
    EmptyQuery,

    #[error("File type '{extension}' is not allowed for upload")]
    UnsupportedFileType { extension: String },

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;

impl FixSuggestion for AssistantError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            AssistantError::Config { .. } => {
                Some("Check the config file path and its keys (endpoint, transport, result_policy, mock)")
            }
            AssistantError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            AssistantError::Json(_) => None,
            AssistantError::Io(_) => Some("Check file path and permissions"),
            AssistantError::Http(_) => {
                Some("Check that the assistant backend is running and reachable")
            }
            AssistantError::InvalidEndpoint { .. } => {
                Some("Use a full http:// or https:// URL, e.g. http://localhost:5000")
            }
            AssistantError::Endpoint(_) => {
                Some("Start the backend or pass --mock to run in offline mode")
            }
            AssistantError::EmptyQuery => Some("Pass a question, e.g. `ask \"What is LlamaIndex?\"`"),
            AssistantError::UnsupportedFileType { .. } => {
                Some("Allowed types: txt, pdf, md, html, csv, json, docx")
            }
            AssistantError::Terminal(_) => Some("Run inside an interactive terminal"),
        }
    }
}
