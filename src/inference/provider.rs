use std::fmt;

use async_trait::async_trait;

use super::types::{ChatReply, OutboundMessage};

/// Errors that can occur while talking to the assistant service.
///
/// The core collapses all of them into one failure category; the variants
/// exist so the log says what actually went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL, client could not be built).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Service answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to run one exchange.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// The full transcript so far, oldest first.
    pub messages: &'a [OutboundMessage],
    /// Optional knowledge domain forwarded to the service.
    pub domain: Option<&'a str>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Runs one request/response exchange.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<ChatReply, ProviderError>;

    /// Checks that the service is reachable, returning its greeting.
    async fn probe(&self) -> Result<String, ProviderError> {
        Ok(format!("{} ready", self.name()))
    }
}
