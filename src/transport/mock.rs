//! Mock transport for offline mode and tests
//!
//! Returns a canned answer after a fixed delay without touching the network.
//! Outcomes can be queued (FIFO) to script successes and failures.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::QueryTransport;
use crate::api::{
    check_upload_extension, DocumentInfo, HealthStatus, QueryRequest, QueryResponse,
    SourceCitation, UploadReceipt,
};
use crate::error::{EndpointFailure, Result};

/// Default completion delay in offline mode
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1000);

pub const CANNED_ANSWER: &str = "LlamaIndex is a data framework for LLM applications to ingest, \
structure, and access private or domain-specific data. It provides data connectors to ingest your \
existing data sources and APIs. It also provides ways to structure your data for different use \
cases, as well as ways to update the data. Finally, it allows you to query your data using natural \
language and build applications.";

/// The answer offline mode gives to every question
pub fn canned_response() -> QueryResponse {
    QueryResponse::new(CANNED_ANSWER).with_sources(vec![
        SourceCitation::new(
            "sample.txt",
            "LlamaIndex is a data framework for LLM applications to ingest, structure, and access \
             private or domain-specific data. It was created by Jerry Liu in late 2022.",
        ),
        SourceCitation::new(
            "documentation.pdf",
            "LlamaIndex provides data connectors to ingest your existing data sources and APIs. \
             It also provides ways to structure your data for different use cases, as well as \
             ways to update the data.",
        ),
    ])
}

type Outcome = std::result::Result<QueryResponse, EndpointFailure>;

pub struct MockTransport {
    delay: Duration,
    /// Scripted outcomes, consumed front to back
    outcomes: Mutex<VecDeque<Outcome>>,
    /// Every request received, for assertions
    requests: Mutex<Vec<QueryRequest>>,
}

impl MockTransport {
    /// Canned answer after [`DEFAULT_MOCK_DELAY`]
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_MOCK_DELAY,
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Canned answer with no delay
    pub fn instant() -> Self {
        Self::new().with_delay(Duration::ZERO)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue a successful answer
    pub fn queue_response(&self, response: QueryResponse) {
        self.outcomes.lock().push_back(Ok(response));
    }

    /// Queue a failure
    pub fn queue_failure(&self, failure: EndpointFailure) {
        self.outcomes.lock().push_back(Err(failure));
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<QueryRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn query(&self, request: &QueryRequest) -> Outcome {
        self.requests.lock().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let scripted = self.outcomes.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(canned_response()))
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            index_status: "ready".to_string(),
            documents: true,
            timestamp: "offline".to_string(),
        })
    }

    async fn documents(&self) -> Result<Vec<DocumentInfo>> {
        Ok(canned_response()
            .sources
            .into_iter()
            .map(|s| {
                let kind = Path::new(&s.file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string();
                DocumentInfo {
                    size: s.text.len() as u64,
                    filename: s.file_name,
                    last_modified: "offline".to_string(),
                    kind,
                }
            })
            .collect())
    }

    async fn upload(&self, path: &Path) -> Result<UploadReceipt> {
        check_upload_extension(path)?;
        tokio::fs::metadata(path).await?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(UploadReceipt {
            message: "Document uploaded successfully".to_string(),
            filename,
            note: Some("Offline mode: nothing was sent".to_string()),
        })
    }
}
