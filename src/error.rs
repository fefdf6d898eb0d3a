//! Error types for ragchat.
//!
//! None of these are fatal to the application: storage failures are logged,
//! backend failures become inline assistant messages, and controller
//! rejections are returned before any state changes.

use thiserror::Error;

/// Failures while writing or removing persisted data.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize conversation: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures talking to the RAG backend.
#[derive(Error, Debug)]
pub enum RagError {
    /// The request never produced a readable response.
    #[error("{0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RagError::InvalidResponse(err.to_string())
        } else {
            RagError::Transport(err.to_string())
        }
    }
}

/// Submissions the request controller refuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("a request is already in flight")]
    Busy,

    #[error("there is no user message to regenerate")]
    NothingToRegenerate,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid backend URL {url:?}: expected an absolute http(s) URL")]
    InvalidBackendUrl { url: String },

    #[error("invalid storage key {key:?}: use 1-64 ASCII letters, digits, '-' or '_'")]
    InvalidStorageKey { key: String },
}

pub type RagResult<T> = Result<T, RagError>;
