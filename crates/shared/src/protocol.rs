use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::SessionId, error::ExchangeError};

/// Transcript text used when the workflow answers without an `output` field.
pub const NO_REPLY_TEXT: &str = "🤖 (No reply from n8n)";

/// Transcript text used for every failed exchange, whatever the cause.
pub const CONNECTION_FAILURE_TEXT: &str =
    "❌ Unable to connect to the n8n server. Please check your workflow.";

/// Body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub session_id: SessionId,
    pub message: String,
}

/// Body returned by the webhook. Fields other than `output` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl WebhookReply {
    pub fn with_output(output: impl Into<String>) -> Self {
        Self {
            output: Some(Value::String(output.into())),
        }
    }

    /// Interprets a decoded response body. Objects contribute their `output`
    /// field, other non-null bodies carry no reply, and `null` is a failure.
    pub fn from_body(body: Value) -> Result<Self, ExchangeError> {
        match body {
            Value::Object(mut fields) => Ok(Self {
                output: fields.remove("output"),
            }),
            Value::Null => Err(ExchangeError::decode("webhook returned a null body")),
            _ => Ok(Self::default()),
        }
    }

    /// Reply text for the transcript; only a non-empty string counts as a reply.
    pub fn reply_text(&self) -> &str {
        match &self.output {
            Some(Value::String(text)) if !text.is_empty() => text,
            _ => NO_REPLY_TEXT,
        }
    }
}
