//! Conversation store: the single source of truth for message history.
//!
//! Every mutation writes the whole sequence back to storage under one key.
//! A failed write is logged and the in-memory history stays authoritative.

use crate::error::StorageError;
use crate::storage::Storage;
use crate::types::Message;
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "ragchat_messages";

pub struct ConversationStore<S: Storage> {
    storage: S,
    key: String,
    messages: Vec<Message>,
}

impl<S: Storage> ConversationStore<S> {
    /// Restore the persisted conversation, or start empty if the entry is
    /// missing or unreadable.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let messages = match storage.get(&key) {
            Some(raw) => match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) => messages,
                Err(err) => {
                    warn!(key = %key, error = %err, "discarding unreadable conversation");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!(key = %key, count = messages.len(), "conversation loaded");
        Self {
            storage,
            key,
            messages,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the most recent user message.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|msg| msg.is_user())
            .map(Message::text)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        if let Err(err) = self.storage.remove(&self.key) {
            warn!(key = %self.key, error = %err, "failed to remove persisted conversation");
        }
    }

    /// Drop the last message if it came from the assistant.
    pub fn remove_trailing_assistant(&mut self) -> Option<Message> {
        if !self.messages.last().is_some_and(Message::is_assistant) {
            return None;
        }
        let removed = self.messages.pop();
        self.persist();
        removed
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.messages)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(&self.key, &raw));
        if let Err(err) = result {
            warn!(key = %self.key, error = %err, "failed to persist conversation");
        }
    }
}
