use std::sync::Arc;

use shared::{
    domain::{ChatMessage, Preferences, SessionId, Theme},
    error::ExchangeError,
    protocol::{WebhookReply, WebhookRequest},
};
use storage::{KeyValueStore, StorageError};
use tracing::info;

pub mod config;
pub mod exchange;
pub mod preferences;
pub mod session;
pub mod webhook;

pub use config::{load_settings, ChatSettings};
pub use exchange::{ExchangeController, ExchangePhase};
pub use preferences::PreferenceStore;
pub use webhook::{HttpWebhook, WebhookTransport};

/// Application state for one chat window: session identity, display
/// preferences and the conversation, all backed by one durable store.
pub struct ChatClient {
    store: Arc<dyn KeyValueStore>,
    session_id: SessionId,
    preferences: PreferenceStore,
    exchange: ExchangeController,
}

impl ChatClient {
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let session_id = session::get_or_create_session_id(store.as_ref());
        let preferences = PreferenceStore::load(store.as_ref());
        info!(session = session_id.short(), "chat client ready");
        Self {
            store,
            session_id,
            preferences,
            exchange: ExchangeController::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences.current()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.toggle_theme(self.store.as_ref())
    }

    pub fn toggle_high_contrast(&mut self) -> bool {
        self.preferences.toggle_high_contrast(self.store.as_ref())
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        self.exchange.transcript()
    }

    pub fn messages_since(&self, seen: usize) -> &[ChatMessage] {
        self.exchange.messages_since(seen)
    }

    pub fn input(&self) -> &str {
        self.exchange.input()
    }

    pub fn input_mut(&mut self) -> &mut String {
        self.exchange.input_mut()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.exchange.is_awaiting_reply()
    }

    pub fn revision(&self) -> u64 {
        self.exchange.revision()
    }

    pub fn submit(&mut self) -> Option<WebhookRequest> {
        self.exchange.submit(&self.session_id)
    }

    pub fn submit_text(&mut self, text: impl Into<String>) -> Option<WebhookRequest> {
        self.exchange.submit_text(&self.session_id, text)
    }

    pub fn resolve(&mut self, outcome: Result<WebhookReply, ExchangeError>) {
        self.exchange.resolve(outcome);
    }

    /// Sends `text` and waits for the reply; `None` if the text was dropped.
    pub async fn exchange<T>(
        &mut self,
        text: impl Into<String>,
        transport: &T,
    ) -> Option<&ChatMessage>
    where
        T: WebhookTransport + ?Sized,
    {
        *self.exchange.input_mut() = text.into();
        self.exchange.exchange(&self.session_id, transport).await
    }

    /// Drops the persisted session id and starts a new one. The transcript
    /// is left as is.
    pub fn reset_session(&mut self) -> Result<&SessionId, StorageError> {
        session::reset_session(self.store.as_ref())?;
        self.session_id = session::get_or_create_session_id(self.store.as_ref());
        Ok(&self.session_id)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
