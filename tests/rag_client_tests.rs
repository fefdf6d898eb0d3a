//! RAG client tests against a `wiremock` server.
//!
//! The client parses the body as JSON whatever the status code, so a 500
//! carrying `{"error": ...}` is a backend-reported error, not a transport one.

use ragchat::ai::{RagBackend, RagClient};
use ragchat::error::RagError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_posts_trimmed_question_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "question": "What is X?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "X is Y.",
            "sources": [{ "id": "doc1", "key": "https://example.com/doc1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RagClient::new(&server.uri());
    let response = client.ask("What is X?").await.expect("ask should succeed");

    assert_eq!(response.answer.as_deref(), Some("X is Y."));
    let sources = response.sources.expect("sources present");
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].id, "doc1");
    assert_eq!(sources[0].key, "https://example.com/doc1");
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_base_url_with_trailing_slash() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RagClient::new(&format!("{}/", server.uri()));
    let response = client.ask("ping").await.expect("ask should succeed");
    assert_eq!(response.answer.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_error_body_is_parsed_regardless_of_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "vector index offline" })),
        )
        .mount(&server)
        .await;

    let client = RagClient::new(&server.uri());
    let response = client.ask("anything").await.expect("JSON body should parse");
    assert_eq!(response.error.as_deref(), Some("vector index offline"));
    assert!(response.answer.is_none());
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = RagClient::new(&server.uri());
    let err = client.ask("anything").await.expect_err("should fail to parse");
    assert!(matches!(err, RagError::InvalidResponse(_)));
    assert!(err.to_string().starts_with("Invalid response from backend"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let client = RagClient::new(&format!("http://127.0.0.1:{port}"));
    let err = client.ask("anything").await.expect_err("nothing is listening");
    assert!(matches!(err, RagError::Transport(_)));
    assert!(!err.to_string().is_empty());
}
