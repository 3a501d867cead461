//! Backend commands queued from UI to backend worker.

use shared::protocol::WebhookRequest;

pub enum BackendCommand {
    DeliverMessage { request: WebhookRequest },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::DeliverMessage { .. } => "deliver_message",
        }
    }
}
