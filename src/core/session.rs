//! The chat session: settings, transcript, pending attachments and the
//! single-flight request state, with persistence at explicit boundaries.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::api::{ChatRequest, ChatTransport, RequestError};
use crate::core::attachment::{Attachment, PendingAttachments};
use crate::core::conversation::Conversation;
use crate::core::ingest::{ingest_all, AttachmentError};
use crate::core::message::Message;
use crate::core::orchestrator::{build_request, compose_user_message};
use crate::core::settings::{Preferences, Settings};
use crate::core::store::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Idle,
    AwaitingResponse,
}

/// A turn whose user message is already in the transcript and whose request
/// is ready to send. Hand it back to [`ChatSession::complete_turn`].
#[derive(Debug)]
pub struct PreparedTurn {
    request: ChatRequest,
}

impl PreparedTurn {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

pub struct ChatSession {
    settings: Settings,
    preferences: Preferences,
    model: String,
    conversation: Conversation,
    pending: PendingAttachments,
    flight: FlightState,
    store: Box<dyn KeyValueStore>,
}

impl ChatSession {
    /// Opens a session from persisted state, seeding default settings first.
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self, StoreError> {
        Self::load_with_env(store, |name| std::env::var(name).ok())
    }

    pub(crate) fn load_with_env(
        mut store: Box<dyn KeyValueStore>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, StoreError> {
        Settings::seed_defaults(store.as_mut())?;
        let settings = Settings::load_with_env(store.as_ref(), env);
        let preferences = Preferences::load(store.as_ref());
        let conversation = Conversation::load(store.as_ref());
        debug!(messages = conversation.len(), "session loaded");

        Ok(Self {
            model: settings.model.clone(),
            settings,
            preferences,
            conversation,
            pending: PendingAttachments::new(),
            flight: FlightState::Idle,
            store,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces and persists the connection settings.
    pub fn save_settings(&mut self, settings: Settings) -> Result<(), StoreError> {
        settings.save(self.store.as_mut())?;
        self.model = settings.model.clone();
        self.settings = settings;
        Ok(())
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn save_preferences(&mut self, preferences: Preferences) -> Result<(), StoreError> {
        preferences.save(self.store.as_mut())?;
        self.preferences = preferences;
        Ok(())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the model for this session only; the saved default is untouched.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn pending(&self) -> &PendingAttachments {
        &self.pending
    }

    pub fn flight_state(&self) -> FlightState {
        self.flight
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.pending.push(attachment);
    }

    /// Ingests files concurrently and queues the ones that succeed, in the
    /// order given. Failures are returned; they do not affect other files.
    pub async fn attach_paths(&mut self, paths: &[PathBuf]) -> Vec<AttachmentError> {
        let mut failures = Vec::new();
        for result in ingest_all(paths).await {
            match result {
                Ok(attachment) => self.pending.push(attachment),
                Err(err) => {
                    warn!(file = %err.file_name, "attachment rejected: {}", err.cause);
                    failures.push(err);
                }
            }
        }
        failures
    }

    pub fn detach(&mut self, name: &str) -> Option<Attachment> {
        self.pending.remove(name)
    }

    pub fn clear_history(&mut self) -> Result<(), StoreError> {
        self.conversation.clear();
        self.conversation.save(self.store.as_mut())
    }

    /// Starts a turn. Returns `None` without touching any state when there is
    /// nothing to send or a request is already outstanding.
    pub fn prepare_turn(&mut self, text: &str) -> Option<PreparedTurn> {
        if self.flight != FlightState::Idle {
            debug!("send ignored: a request is already in flight");
            return None;
        }
        if text.trim().is_empty() && self.pending.is_empty() {
            return None;
        }

        let attachments = self.pending.take();
        let user_message = compose_user_message(text, &attachments)?;
        let request = build_request(
            &self.settings,
            &self.model,
            self.conversation.messages(),
            user_message.clone(),
        );

        self.conversation.push(user_message);
        self.flight = FlightState::AwaitingResponse;
        Some(PreparedTurn { request })
    }

    /// Finishes a turn: appends the reply (or the error as an assistant
    /// message), returns to idle and persists the transcript. Returns `None`
    /// and changes nothing when no turn is awaiting a response.
    pub fn complete_turn(
        &mut self,
        turn: PreparedTurn,
        result: Result<String, RequestError>,
    ) -> Option<&Message> {
        if self.flight != FlightState::AwaitingResponse {
            warn!("ignoring a reply with no turn in flight");
            return None;
        }

        let reply = match result {
            Ok(content) => Message::assistant(content),
            Err(err) => {
                warn!(model = %turn.request.model, "chat request failed: {err}");
                Message::assistant_error(err.to_string())
            }
        };

        self.conversation.push(reply);
        self.flight = FlightState::Idle;
        if let Err(err) = self.conversation.save(self.store.as_mut()) {
            warn!("failed to persist conversation: {err}");
        }

        self.conversation.last()
    }

    /// Runs one full turn against `transport`. Returns the assistant message,
    /// or `None` if the send was a no-op.
    pub async fn send_turn(
        &mut self,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Option<&Message> {
        let turn = self.prepare_turn(text)?;
        let result = transport.complete(&turn.request).await;
        self.complete_turn(turn, result)
    }
}
