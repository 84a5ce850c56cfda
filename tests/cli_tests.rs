//! Integration tests for the knowledge-assistant CLI
//!
//! These run the actual binary in offline mode (or against a dead port) and
//! verify its output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Binary with a clean environment and an instant mock
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("knowledge-assistant").unwrap();
    cmd.env_remove("KNOWLEDGE_ASSISTANT_ENDPOINT")
        .env_remove("KNOWLEDGE_ASSISTANT_TRANSPORT")
        .env("KNOWLEDGE_ASSISTANT_MOCK_DELAY_MS", "0")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_flag() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ask questions about your documents"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("tui"));
}

#[test]
fn test_ask_help() {
    cli()
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sources"))
        .stdout(predicate::str::contains("--json"));
}

// ============================================================================
// ask (offline)
// ============================================================================

#[test]
fn test_ask_mock_prints_answer() {
    cli()
        .args(["--mock", "ask", "What", "is", "LlamaIndex?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer"))
        .stdout(predicate::str::contains("LlamaIndex is a data framework"))
        .stdout(predicate::str::contains("View Sources (2)"))
        .stdout(predicate::str::contains("sample.txt").not());
}

#[test]
fn test_ask_mock_with_sources() {
    cli()
        .args(["--mock", "ask", "--sources", "What is LlamaIndex?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sources (2)"))
        .stdout(predicate::str::contains("1. sample.txt"))
        .stdout(predicate::str::contains("2. documentation.pdf"));
}

#[test]
fn test_ask_json() {
    let output = cli()
        .args(["--mock", "ask", "--json", "What is LlamaIndex?"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "succeeded");
    assert_eq!(value["query"], "What is LlamaIndex?");
    assert_eq!(value["sources"].as_array().unwrap().len(), 2);
}

#[test]
fn test_ask_empty_question_fails() {
    cli()
        .args(["--mock", "ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question is empty"));
}

#[test]
fn test_ask_unreachable_backend() {
    cli()
        .args(["--endpoint", "http://127.0.0.1:9", "ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to get an answer. The backend may be unreachable.",
        ))
        .stderr(predicate::str::contains("--mock"));
}

#[test]
fn test_bad_endpoint_url() {
    cli()
        .args(["--endpoint", "ftp://example.com", "ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid endpoint URL"));
}

// ============================================================================
// auxiliary commands (offline)
// ============================================================================

#[test]
fn test_health_mock() {
    cli()
        .args(["--mock", "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend healthy"))
        .stdout(predicate::str::contains("Index: ready"));
}

#[test]
fn test_documents_mock() {
    cli()
        .args(["--mock", "documents"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 documents"))
        .stdout(predicate::str::contains("documentation.pdf"));
}

#[test]
fn test_upload_disallowed_extension() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("payload.exe");
    fs::write(&file, "x").unwrap();

    cli()
        .args(["--mock", "upload", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"))
        .stderr(predicate::str::contains("docx"));
}

#[test]
fn test_upload_mock() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("notes.txt");
    fs::write(&file, "hello").unwrap();

    cli()
        .args(["--mock", "upload", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt"))
        .stdout(predicate::str::contains("Offline mode"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_defaults() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:5000"))
        .stdout(predicate::str::contains("transport: http"))
        .stdout(predicate::str::contains("result_policy: clear-on-submit"));
}

#[test]
fn test_config_file_and_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("assistant.yaml");
    fs::write(
        &config_file,
        "endpoint: http://kb.local:5000\nresult_policy: keep-until-resolved\n",
    )
    .unwrap();

    cli()
        .args(["--config", config_file.to_str().unwrap(), "--mock", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://kb.local:5000"))
        .stdout(predicate::str::contains("transport: mock"))
        .stdout(predicate::str::contains("keep-until-resolved"));
}

#[test]
fn test_env_endpoint_beats_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("knowledge-assistant.yaml"),
        "endpoint: http://from-file:5000\n",
    )
    .unwrap();

    cli()
        .current_dir(temp_dir.path())
        .env("KNOWLEDGE_ASSISTANT_ENDPOINT", "http://from-env:5000")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://from-env:5000"));
}

#[test]
fn test_missing_config_file() {
    cli()
        .args(["--config", "/no/such/file.yaml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
