//! HTTP transport for the assistant endpoint
//!
//! One reqwest client rooted at a base URL. No timeout is set beyond the
//! client default; the backend owns how long an answer takes.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use super::QueryTransport;
use crate::api::{
    check_upload_extension, DocumentInfo, DocumentList, ErrorBody, HealthStatus, QueryRequest,
    QueryResponse, UploadReceipt, DOCUMENTS_PATH, HEALTH_PATH, QUERY_PATH, UPLOAD_PATH,
};
use crate::error::{AssistantError, EndpointFailure, Result};

pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
    query_url: Url,
    health_url: Url,
    documents_url: Url,
    upload_url: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `endpoint`, e.g. `http://localhost:5000`
    pub fn new(endpoint: &str) -> Result<Self> {
        let base = parse_base_url(endpoint)?;
        let join = |path: &str| {
            base.join(path).map_err(|e| AssistantError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })
        };

        Ok(Self {
            client: reqwest::Client::new(),
            query_url: join(QUERY_PATH)?,
            health_url: join(HEALTH_PATH)?,
            documents_url: join(DOCUMENTS_PATH)?,
            upload_url: join(UPLOAD_PATH)?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }
}

/// Parse and normalize the base URL so relative joins append instead of replace
fn parse_base_url(endpoint: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint.trim()).map_err(|e| AssistantError::InvalidEndpoint {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AssistantError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Decode a 2xx body, or turn a non-2xx into an [`EndpointFailure`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "Endpoint returned an error");
        return Err(match ErrorBody::message_from(&body) {
            Some(message) => EndpointFailure::with_message(message),
            None => EndpointFailure::unreachable(),
        }
        .into());
    }
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl QueryTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn query(&self, request: &QueryRequest) -> std::result::Result<QueryResponse, EndpointFailure> {
        tracing::debug!(endpoint = %self.query_url, "Sending query");

        let response = self
            .client
            .post(self.query_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.query_url, error = %e, "Query request failed");
                EndpointFailure::unreachable()
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = ErrorBody::message_from(&body);
            tracing::warn!(
                endpoint = %self.query_url,
                status = %status,
                server_message = message.as_deref().unwrap_or(""),
                "Query rejected by endpoint"
            );
            return Err(EndpointFailure { message });
        }

        let answer = response.json::<QueryResponse>().await.map_err(|e| {
            tracing::warn!(endpoint = %self.query_url, error = %e, "Malformed query response");
            EndpointFailure::unreachable()
        })?;

        tracing::debug!(sources = answer.sources.len(), "Query answered");
        Ok(answer)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.health_url.clone()).send().await?;
        decode(response).await
    }

    async fn documents(&self) -> Result<Vec<DocumentInfo>> {
        let response = self.client.get(self.documents_url.clone()).send().await?;
        let list: DocumentList = decode(response).await?;
        Ok(list.documents)
    }

    async fn upload(&self, path: &Path) -> Result<UploadReceipt> {
        check_upload_extension(path)?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        tracing::info!(file = %file_name, size = bytes.len(), "Uploading document");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }
}
