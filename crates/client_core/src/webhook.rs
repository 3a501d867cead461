use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ExchangeError,
    protocol::{WebhookReply, WebhookRequest},
};
use tracing::debug;
use url::Url;

/// Delivers one chat message to the remote workflow and returns its reply.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookReply, ExchangeError>;
}

/// JSON-over-HTTP webhook. No timeout and no retry are applied.
#[derive(Debug, Clone)]
pub struct HttpWebhook {
    http: Client,
    endpoint: Url,
}

impl HttpWebhook {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhook {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookReply, ExchangeError> {
        debug!(endpoint = %self.endpoint, "posting chat message to webhook");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| ExchangeError::transport(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        let body = res
            .bytes()
            .await
            .map_err(|err| ExchangeError::transport(err.to_string()))?;
        let body: serde_json::Value =
            serde_json::from_slice(&body).map_err(|err| ExchangeError::decode(err.to_string()))?;
        WebhookReply::from_body(body)
    }
}

#[cfg(test)]
#[path = "tests/webhook_tests.rs"]
mod tests;
