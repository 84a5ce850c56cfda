//! HTTP transport tests against a wiremock backend
//!
//! Covers the `/api/query` contract end to end through the query panel,
//! plus the auxiliary health, documents and upload endpoints.

use std::fs;

use knowledge_assistant::api::{QueryRequest, SourceCitation};
use knowledge_assistant::error::{AssistantError, FALLBACK_ERROR_MESSAGE};
use knowledge_assistant::panel::{QueryPanel, RequestStatus, ResultPolicy};
use knowledge_assistant::transport::{HttpTransport, QueryTransport};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPERS
// =============================================================================

fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(&server.uri()).unwrap()
}

async fn mount_query(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(response)
        .mount(server)
        .await;
}

// =============================================================================
// QUERY CONTRACT
// =============================================================================

#[tokio::test]
async fn test_query_posts_trimmed_question_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_json(json!({"query": "What is LlamaIndex?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "A framework."})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("   What is LlamaIndex?\n");

    let status = panel.run(&transport).await;

    assert_eq!(status, Some(RequestStatus::Succeeded));
    assert_eq!(panel.visible_answer(), Some("A framework."));
}

#[tokio::test]
async fn test_success_with_sources() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "answer": "X",
            "sources": [{"file_name": "a.txt", "text": "t1"}]
        })),
    )
    .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("q");
    panel.run(&transport).await;

    assert_eq!(panel.status(), RequestStatus::Succeeded);
    assert_eq!(panel.visible_answer(), Some("X"));
    assert_eq!(panel.visible_sources(), &[SourceCitation::new("a.txt", "t1")]);
    assert!(panel.shows_citations());
}

#[tokio::test]
async fn test_success_without_sources() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"answer": "X"})),
    )
    .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("q");
    panel.run(&transport).await;

    assert_eq!(panel.status(), RequestStatus::Succeeded);
    assert!(panel.visible_sources().is_empty());
    assert!(!panel.shows_citations());
}

#[tokio::test]
async fn test_backend_extras_are_kept() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "answer": "X",
            "query_time": "1.20s",
            "sources": [{
                "file_name": "guide.md",
                "text": "t",
                "score": 0.91,
                "document_id": "abc",
                "metadata": {"file_name": "guide.md"}
            }]
        })),
    )
    .await;

    let transport = transport_for(&server);
    let resp = transport.query(&QueryRequest::new("q")).await.unwrap();

    assert_eq!(resp.query_time.as_deref(), Some("1.20s"));
    assert_eq!(resp.sources[0].score, Some(0.91));
    assert_eq!(resp.sources[0].document_id.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_error_field_is_shown_verbatim() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({"error": "custom msg"})),
    )
    .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("q");

    assert_eq!(panel.run(&transport).await, Some(RequestStatus::Failed));
    assert_eq!(panel.error(), Some("custom msg"));
    assert!(panel.visible_answer().is_none());
}

#[tokio::test]
async fn test_client_error_uses_server_message() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({"error": "Query is required"})),
    )
    .await;

    let transport = transport_for(&server);
    let failure = transport.query(&QueryRequest::new("q")).await.unwrap_err();
    assert_eq!(failure.user_message(), "Query is required");
}

#[tokio::test]
async fn test_error_without_body_falls_back() {
    let server = MockServer::start().await;
    mount_query(&server, ResponseTemplate::new(502).set_body_string("Bad Gateway")).await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("q");
    panel.run(&transport).await;

    assert_eq!(panel.status(), RequestStatus::Failed);
    assert_eq!(panel.error(), Some(FALLBACK_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_malformed_success_body_is_a_failure() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})),
    )
    .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("q");
    panel.run(&transport).await;

    assert_eq!(panel.status(), RequestStatus::Failed);
    assert_eq!(panel.error(), Some(FALLBACK_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_unreachable_backend_falls_back() {
    // Start and drop a server to get a port nothing listens on
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let transport = HttpTransport::new(&uri).unwrap();
    let mut panel = QueryPanel::new();
    panel.set_query("q");
    panel.run(&transport).await;

    assert_eq!(panel.status(), RequestStatus::Failed);
    assert_eq!(panel.error(), Some(FALLBACK_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_empty_query_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::new();
    panel.set_query("  \t ");

    assert_eq!(panel.run(&transport).await, None);
    assert_eq!(panel.status(), RequestStatus::Idle);
}

#[tokio::test]
async fn test_sequential_cycles_replace_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_json(json!({"query": "first"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "one",
            "sources": [{"file_name": "a.txt", "text": "t1"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_json(json!({"query": "second"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "two",
            "sources": [{"file_name": "b.txt", "text": "t2"}, {"file_name": "c.txt", "text": "t3"}]
        })))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut panel = QueryPanel::with_policy(ResultPolicy::ClearOnSubmit);

    panel.set_query("first");
    panel.run(&transport).await;
    assert_eq!(panel.visible_answer(), Some("one"));

    panel.set_query("second");
    panel.run(&transport).await;
    assert_eq!(panel.visible_answer(), Some("two"));
    let names: Vec<_> = panel
        .visible_sources()
        .iter()
        .map(|s| s.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["b.txt", "c.txt"]);
}

#[tokio::test]
async fn test_base_path_prefix_is_respected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/assistant/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "prefixed"})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&format!("{}/assistant", server.uri())).unwrap();
    let resp = transport.query(&QueryRequest::new("q")).await.unwrap();
    assert_eq!(resp.answer, "prefixed");
}

// =============================================================================
// AUXILIARY ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "indexStatus": "ready",
            "documents": true,
            "timestamp": "2024-03-01T10:00:00"
        })))
        .mount(&server)
        .await;

    let health = transport_for(&server).health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.index_status, "ready");
    assert!(health.documents);
}

#[tokio::test]
async fn test_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"filename": "a.pdf", "size": 2048, "last_modified": "2024-01-01T00:00:00", "type": "pdf"},
                {"filename": "b.txt", "size": 12, "last_modified": "2024-01-02T00:00:00", "type": "txt"}
            ]
        })))
        .mount(&server)
        .await;

    let docs = transport_for(&server).documents().await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].filename, "a.pdf");
    assert_eq!(docs[1].kind, "txt");
}

#[tokio::test]
async fn test_documents_error_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Error listing documents"})),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server).documents().await.unwrap_err();
    assert!(matches!(err, AssistantError::Endpoint(_)));
    assert_eq!(err.to_string(), "Error listing documents");
}

#[tokio::test]
async fn test_upload_sends_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Document uploaded successfully",
            "filename": "notes.md",
            "note": "The document will be indexed on the next server restart"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.md");
    fs::write(&file, "# Notes\n").unwrap();

    let receipt = transport_for(&server).upload(&file).await.unwrap();
    assert_eq!(receipt.filename, "notes.md");
    assert!(receipt.note.unwrap().contains("next server restart"));
}

#[tokio::test]
async fn test_upload_rejects_extension_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("tool.exe");
    fs::write(&file, [0u8; 4]).unwrap();

    let err = transport_for(&server).upload(&file).await.unwrap_err();
    assert!(matches!(err, AssistantError::UnsupportedFileType { .. }));
}
