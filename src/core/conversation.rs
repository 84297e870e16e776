use tracing::warn;

use crate::core::message::Message;
use crate::core::store::{keys, KeyValueStore, StoreError};

/// Ordered transcript. Only appends and a full clear are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
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

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.messages)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self::from_messages)
    }

    /// Loads the stored transcript. A missing or unreadable snapshot yields an
    /// empty conversation.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(keys::CHAT) else {
            return Self::new();
        };

        match Self::from_json(&raw) {
            Ok(conversation) => conversation,
            Err(err) => {
                warn!("discarding unreadable conversation snapshot: {err}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let raw = self.to_json().map_err(|source| StoreError::Encode {
            key: keys::CHAT,
            source,
        })?;
        store.set(keys::CHAT, &raw)
    }
}
