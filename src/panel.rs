//! Query Panel - the request-cycle state machine
//!
//! ```text
//! Idle ──submit──► Loading ──ok────► Succeeded ──submit──► Loading
//!                          └─error─► Failed    ──submit──► Loading
//! ```
//!
//! Idle is only the initial state. A cycle is split in two halves so the
//! caller owns the single suspension point: [`QueryPanel::submit`] hands out
//! a [`Ticket`], the caller performs the request, and
//! [`QueryPanel::resolve`] applies the outcome. [`QueryPanel::run`] does all
//! three for callers that can simply await.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::{QueryRequest, QueryResponse, SourceCitation};
use crate::error::EndpointFailure;
use crate::transport::QueryTransport;

// ─────────────────────────────────────────────────────────────────────────────
// Request Status
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Loading => write!(f, "LOADING"),
            Self::Succeeded => write!(f, "SUCCEEDED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Policy
// ─────────────────────────────────────────────────────────────────────────────

/// What a new submission does to the previous answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultPolicy {
    /// Clear answer and sources as soon as the request starts
    #[default]
    ClearOnSubmit,
    /// Keep showing the previous answer until the new one resolves
    KeepUntilResolved,
}

// ─────────────────────────────────────────────────────────────────────────────
// Ticket
// ─────────────────────────────────────────────────────────────────────────────

/// Handle for one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    query: String,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The trimmed question to send
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn request(&self) -> QueryRequest {
        QueryRequest::new(self.query.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Panel
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct QueryPanel {
    query: String,
    status: RequestStatus,
    answer: Option<String>,
    sources: Vec<SourceCitation>,
    query_time: Option<String>,
    error: Option<String>,
    sources_visible: bool,
    generation: u64,
    policy: ResultPolicy,
}

impl QueryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ResultPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Replace the input text verbatim
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Start a request cycle.
    ///
    /// Returns `None` without touching any state when the trimmed query is
    /// empty or a request is already in flight.
    pub fn submit(&mut self) -> Option<Ticket> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() || self.is_submit_disabled() {
            return None;
        }
        let query = trimmed.to_string();

        self.generation += 1;
        self.status = RequestStatus::Loading;
        self.error = None;
        if self.policy == ResultPolicy::ClearOnSubmit {
            self.clear_results();
        }

        tracing::debug!(generation = self.generation, "Request cycle started");
        Some(Ticket {
            generation: self.generation,
            query,
        })
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// Returns `false` when the ticket is stale and nothing changed.
    pub fn resolve(
        &mut self,
        ticket: &Ticket,
        outcome: Result<QueryResponse, EndpointFailure>,
    ) -> bool {
        if ticket.generation != self.generation || self.status != RequestStatus::Loading {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale completion"
            );
            return false;
        }

        match outcome {
            Ok(response) => {
                tracing::info!(
                    generation = ticket.generation,
                    sources = response.sources.len(),
                    "Answer received"
                );
                self.answer = Some(response.answer);
                self.sources = response.sources;
                self.query_time = response.query_time;
                self.status = RequestStatus::Succeeded;
            }
            Err(failure) => {
                tracing::warn!(generation = ticket.generation, error = %failure, "Request failed");
                self.clear_results();
                self.error = Some(failure.user_message().to_string());
                self.status = RequestStatus::Failed;
            }
        }
        true
    }

    /// Submit, await the transport once, resolve.
    ///
    /// Returns the resulting status, or `None` if the submission was a no-op.
    pub async fn run(&mut self, transport: &dyn QueryTransport) -> Option<RequestStatus> {
        let ticket = self.submit()?;
        let outcome = transport.query(&ticket.request()).await;
        self.resolve(&ticket, outcome);
        Some(self.status)
    }

    pub fn toggle_sources_visible(&mut self) {
        self.sources_visible = !self.sources_visible;
    }

    fn clear_results(&mut self) {
        self.answer = None;
        self.sources.clear();
        self.query_time = None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selectors
    // ─────────────────────────────────────────────────────────────────────

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn policy(&self) -> ResultPolicy {
        self.policy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stored answer, regardless of whether it is currently displayable
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn sources(&self) -> &[SourceCitation] {
        &self.sources
    }

    pub fn query_time(&self) -> Option<&str> {
        self.query_time.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sources_visible(&self) -> bool {
        self.sources_visible
    }

    /// Submit control is disabled for the whole time a request is in flight
    pub fn is_submit_disabled(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    /// Whether the stored answer may be shown right now
    fn results_displayable(&self) -> bool {
        match self.status {
            RequestStatus::Succeeded => true,
            RequestStatus::Loading => self.policy == ResultPolicy::KeepUntilResolved,
            RequestStatus::Idle | RequestStatus::Failed => false,
        }
    }

    pub fn visible_answer(&self) -> Option<&str> {
        if self.results_displayable() {
            self.answer()
        } else {
            None
        }
    }

    pub fn visible_sources(&self) -> &[SourceCitation] {
        if self.results_displayable() {
            &self.sources
        } else {
            &[]
        }
    }

    /// The sources toggle is only offered when there is something to show
    pub fn shows_citations(&self) -> bool {
        !self.visible_sources().is_empty()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            query: self.query.clone(),
            status: self.status,
            answer: self.visible_answer().map(str::to_string),
            sources: self.visible_sources().to_vec(),
            query_time: self.query_time.clone().filter(|_| self.results_displayable()),
            error: self.error.clone(),
        }
    }
}

/// Serializable view of a panel, used for `--json` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub query: String,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub sources: Vec<SourceCitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
