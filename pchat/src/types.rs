//! Chat session type.

use pcommon::SessionId;
use pprovider::Turn;
use tracing::Instrument;

use crate::{
    ChatExchanger, ConversationStore, ExchangeError, InMemoryConversationStore, Settings,
};

/// One interactive conversation: its settings, its transcript and the
/// exchanger used to extend it.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    settings: Settings,
    exchanger: ChatExchanger,
    store: InMemoryConversationStore,
}

impl ChatSession {
    pub fn new(id: impl Into<SessionId>, settings: Settings, exchanger: ChatExchanger) -> Self {
        Self {
            id: id.into(),
            settings,
            exchanger,
            store: InMemoryConversationStore::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn model(&self) -> &str {
        self.settings.model()
    }

    pub fn turns(&self) -> &[Turn] {
        self.store.turns()
    }

    pub fn store(&self) -> &InMemoryConversationStore {
        &self.store
    }

    pub async fn send(&mut self, user_text: &str) -> Result<String, ExchangeError> {
        let span = tracing::info_span!("chat_exchange", session_id = %self.id);
        self.exchanger
            .send(&self.settings, &mut self.store, user_text)
            .instrument(span)
            .await
    }

    pub fn reset(&mut self) {
        self.store.reset();
        tracing::info!(
            phase = "session",
            event = "reset",
            session_id = %self.id
        );
    }
}
