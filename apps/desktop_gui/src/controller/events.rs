//! Backend-to-UI events for the desktop GUI controller.

use shared::{error::ExchangeError, protocol::WebhookReply};

pub enum UiEvent {
    ReplyReceived(Result<WebhookReply, ExchangeError>),
    BackendUnavailable(String),
}
