use thiserror::Error;

/// Why an exchange with the webhook failed. Logged, never shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("webhook transport failure: {0}")]
    Transport(String),
    #[error("webhook responded with status {0}")]
    Status(u16),
    #[error("webhook reply could not be decoded: {0}")]
    Decode(String),
}

impl ExchangeError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
