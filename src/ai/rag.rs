use crate::error::{RagError, RagResult};
use crate::types::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const RAG_PATH: &str = "/rag";

#[derive(Serialize)]
struct RagRequest<'a> {
    question: &'a str,
}

/// Body returned by the backend. Every field is optional; a backend-reported
/// failure arrives in `error`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RagResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[async_trait]
pub trait RagBackend: Send + Sync {
    async fn ask(&self, question: &str) -> RagResult<RagResponse>;
}

/// Client for the `POST {base}/rag` endpoint.
#[derive(Clone)]
pub struct RagClient {
    client: Client,
    endpoint: String,
}

impl RagClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: rag_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn rag_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), RAG_PATH)
}

/// Parse a response body regardless of the HTTP status it came with.
pub fn parse_rag_response(body: &str) -> RagResult<RagResponse> {
    serde_json::from_str::<RagResponse>(body).map_err(|err| RagError::InvalidResponse(err.to_string()))
}

#[async_trait]
impl RagBackend for RagClient {
    async fn ask(&self, question: &str) -> RagResult<RagResponse> {
        debug!(endpoint = %self.endpoint, "posting question");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RagRequest { question })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "backend responded");
        parse_rag_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(rag_endpoint("http://localhost:8000"), "http://localhost:8000/rag");
        assert_eq!(rag_endpoint("http://localhost:8000/"), "http://localhost:8000/rag");
        assert_eq!(rag_endpoint("https://host/api/"), "https://host/api/rag");
    }

    #[test]
    fn parses_full_response() {
        let parsed = parse_rag_response(
            r#"{"answer":"X is Y.","sources":[{"id":"doc1","key":"https://example.com/doc1"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.answer.as_deref(), Some("X is Y."));
        assert_eq!(parsed.sources.unwrap().len(), 1);
        assert!(parsed.error.is_none());
    }

    #[test]
    fn parses_error_only_and_empty_object() {
        let parsed = parse_rag_response(r#"{"error":"index offline"}"#).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("index offline"));
        assert!(parsed.answer.is_none());

        assert_eq!(parse_rag_response("{}").unwrap(), RagResponse::default());
    }

    #[test]
    fn rejects_non_json_body() {
        let err = parse_rag_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, RagError::InvalidResponse(_)));
    }
}
