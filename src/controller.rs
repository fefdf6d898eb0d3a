//! Request controller: one outstanding backend call at a time.
//!
//! A send happens in two phases. `begin_send` appends the user message and
//! moves to `Sending`; `complete` appends the assistant reply and moves back
//! to `Idle`. UI code holds the controller between the phases while the
//! backend call runs in a spawned task; `send` and `regenerate` chain both
//! phases around an awaited backend.

use crate::ai::{RagBackend, RagResponse};
use crate::error::{ControllerError, RagResult};
use crate::storage::Storage;
use crate::store::ConversationStore;
use crate::types::{Message, is_blank};
use tracing::{info, warn};

pub const NETWORK_ERROR: &str = "Network error";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Sending,
}

/// Question accepted by the controller, waiting to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub question: String,
}

pub struct RequestController<S: Storage> {
    store: ConversationStore<S>,
    state: RequestState,
}

impl<S: Storage> RequestController<S> {
    pub fn new(store: ConversationStore<S>) -> Self {
        Self {
            store,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == RequestState::Sending
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn store(&self) -> &ConversationStore<S> {
        &self.store
    }

    /// Whether `regenerate` would be accepted right now.
    pub fn can_regenerate(&self) -> bool {
        !self.is_sending() && self.store.last_user_text().is_some()
    }

    /// Index of the message that carries the regenerate action: the trailing
    /// assistant reply, or a trailing user question that never got one.
    pub fn regenerate_anchor(&self) -> Option<usize> {
        if !self.can_regenerate() {
            return None;
        }
        self.store.messages().len().checked_sub(1)
    }

    pub fn begin_send(&mut self, prompt: &str) -> Result<PendingRequest, ControllerError> {
        let question = prompt.trim();
        if question.is_empty() {
            return Err(ControllerError::EmptyPrompt);
        }
        if self.is_sending() {
            return Err(ControllerError::Busy);
        }

        self.store.append(Message::user(question));
        self.state = RequestState::Sending;
        info!(chars = question.len(), "question submitted");
        Ok(PendingRequest {
            question: question.to_string(),
        })
    }

    /// Record the backend outcome for the in-flight request.
    ///
    /// Returns `None` without touching the conversation when nothing is in
    /// flight.
    pub fn complete(&mut self, outcome: RagResult<RagResponse>) -> Option<&Message> {
        if !self.is_sending() {
            warn!("discarding backend outcome with no request in flight");
            return None;
        }
        Some(self.finish(outcome))
    }

    pub async fn send<B>(&mut self, backend: &B, prompt: &str) -> Result<&Message, ControllerError>
    where
        B: RagBackend + ?Sized,
    {
        let pending = self.begin_send(prompt)?;
        let outcome = backend.ask(&pending.question).await;
        Ok(self.finish(outcome))
    }

    /// Prepare to ask the latest user question again.
    ///
    /// A trailing assistant reply is removed so the new one takes its slot;
    /// the question itself is appended again as a fresh user message.
    pub fn begin_regenerate(&mut self) -> Result<PendingRequest, ControllerError> {
        if self.is_sending() {
            return Err(ControllerError::Busy);
        }
        let prompt = self
            .store
            .last_user_text()
            .map(str::to_string)
            .ok_or(ControllerError::NothingToRegenerate)?;

        self.store.remove_trailing_assistant();
        self.begin_send(&prompt)
    }

    pub async fn regenerate<B>(&mut self, backend: &B) -> Result<&Message, ControllerError>
    where
        B: RagBackend + ?Sized,
    {
        let pending = self.begin_regenerate()?;
        let outcome = backend.ask(&pending.question).await;
        Ok(self.finish(outcome))
    }

    /// Start over with an empty conversation.
    pub fn new_chat(&mut self) -> Result<(), ControllerError> {
        if self.is_sending() {
            return Err(ControllerError::Busy);
        }
        self.store.clear();
        info!("conversation cleared");
        Ok(())
    }

    fn finish(&mut self, outcome: RagResult<RagResponse>) -> &Message {
        let message = assistant_message(outcome);
        self.store.append(message);
        self.state = RequestState::Idle;
        let appended = self.store.messages().len() - 1;
        &self.store.messages()[appended]
    }
}

/// Build the assistant message for a backend outcome.
///
/// Transport and parse failures carry their description, or the generic
/// network error when there is none.
pub fn assistant_message(outcome: RagResult<RagResponse>) -> Message {
    match outcome {
        Ok(response) => {
            let error = response.error.filter(|err| !is_blank(err));
            if let Some(err) = &error {
                info!(error = %err, "backend reported an error");
            }
            Message::assistant(response.answer.unwrap_or_default(), response.sources, error)
        }
        Err(err) => {
            warn!(error = %err, "request failed");
            let description = err.to_string();
            if is_blank(&description) {
                Message::assistant_error(NETWORK_ERROR)
            } else {
                Message::assistant_error(description)
            }
        }
    }
}
