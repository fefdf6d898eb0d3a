use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A citation returned by the backend alongside an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    User {
        id: String,
        text: String,
        timestamp: i64,
    },
    Assistant {
        id: String,
        text: String,
        timestamp: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sources: Option<Vec<Source>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message::User {
            id: new_message_id(),
            text: text.into(),
            timestamp: now_millis(),
        }
    }

    pub fn assistant(
        text: impl Into<String>,
        sources: Option<Vec<Source>>,
        error: Option<String>,
    ) -> Self {
        Message::Assistant {
            id: new_message_id(),
            text: text.into(),
            timestamp: now_millis(),
            sources,
            error,
        }
    }

    /// Assistant message carrying only a failure description.
    pub fn assistant_error(error: impl Into<String>) -> Self {
        Self::assistant(String::new(), None, Some(error.into()))
    }

    pub fn id(&self) -> &str {
        match self {
            Message::User { id, .. } | Message::Assistant { id, .. } => id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Message::User { text, .. } | Message::Assistant { text, .. } => text,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Message::User { timestamp, .. } | Message::Assistant { timestamp, .. } => *timestamp,
        }
    }

    /// Failure carried by an assistant message. Blank descriptions count as
    /// no failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Message::Assistant { error, .. } => error.as_deref().filter(|err| !is_blank(err)),
            Message::User { .. } => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User { .. })
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Message::Assistant { .. })
    }
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis() as i64)
        .unwrap_or_default()
}
