/// Backend access for ragchat
///
/// The retrieval and generation pipeline lives behind a single HTTP endpoint.
/// This module only knows how to ask it a question and read the answer.
///
/// # Usage
///
/// ```rust,no_run
/// use ragchat::ai::{RagBackend, RagClient};
///
/// # async fn example() -> Result<(), ragchat::error::RagError> {
/// let client = RagClient::new("http://localhost:8000");
/// let response = client.ask("What is X?").await?;
/// # Ok(())
/// # }
/// ```
mod rag;

pub use rag::{RagBackend, RagClient, RagResponse, parse_rag_response, rag_endpoint};
