//! Transcript and request/reply state machine for a single conversation.

use shared::{
    domain::{ChatMessage, SessionId},
    error::ExchangeError,
    protocol::{WebhookReply, WebhookRequest, CONNECTION_FAILURE_TEXT},
};
use tracing::{debug, warn};

use crate::webhook::WebhookTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    AwaitingReply,
}

/// Owns the append-only transcript and the composer input buffer.
///
/// At most one exchange is outstanding: submissions made while a reply is
/// pending are dropped without touching the transcript.
#[derive(Debug, Clone)]
pub struct ExchangeController {
    transcript: Vec<ChatMessage>,
    input: String,
    phase: ExchangePhase,
    revision: u64,
}

impl Default for ExchangeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeController {
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::greeting()],
            input: String::new(),
            phase: ExchangePhase::Idle,
            revision: 0,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Messages appended after the first `seen` entries.
    pub fn messages_since(&self, seen: usize) -> &[ChatMessage] {
        self.transcript.get(seen..).unwrap_or_default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.phase == ExchangePhase::AwaitingReply
    }

    /// Bumped on every transcript append; views scroll when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Starts an exchange for the current input buffer.
    ///
    /// Returns the request to deliver, or `None` when the input is blank or a
    /// reply is still outstanding.
    pub fn submit(&mut self, session_id: &SessionId) -> Option<WebhookRequest> {
        if self.input.trim().is_empty() {
            debug!("ignoring blank submission");
            return None;
        }
        if self.is_awaiting_reply() {
            debug!("ignoring submission while a reply is outstanding");
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.append(ChatMessage::user(message.clone()));
        self.phase = ExchangePhase::AwaitingReply;
        Some(WebhookRequest {
            session_id: session_id.clone(),
            message,
        })
    }

    pub fn submit_text(
        &mut self,
        session_id: &SessionId,
        text: impl Into<String>,
    ) -> Option<WebhookRequest> {
        self.input = text.into();
        self.submit(session_id)
    }

    /// Appends the bot side of the outstanding exchange and returns to idle.
    pub fn resolve(&mut self, outcome: Result<WebhookReply, ExchangeError>) {
        if !self.is_awaiting_reply() {
            warn!("discarding webhook outcome with no exchange outstanding");
            return;
        }

        let text = match outcome {
            Ok(reply) => reply.reply_text().to_string(),
            Err(err) => {
                warn!("webhook exchange failed: {err}");
                CONNECTION_FAILURE_TEXT.to_string()
            }
        };
        self.append(ChatMessage::bot(text));
        self.phase = ExchangePhase::Idle;
    }

    /// Submits the input buffer, awaits the transport and records the outcome.
    /// Returns the bot message, or `None` if the submission was dropped.
    pub async fn exchange<T>(
        &mut self,
        session_id: &SessionId,
        transport: &T,
    ) -> Option<&ChatMessage>
    where
        T: WebhookTransport + ?Sized,
    {
        let request = self.submit(session_id)?;
        let outcome = transport.deliver(&request).await;
        self.resolve(outcome);
        self.transcript.last()
    }

    fn append(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
#[path = "tests/exchange_tests.rs"]
mod tests;
