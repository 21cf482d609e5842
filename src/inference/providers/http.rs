//! HTTP provider for the assistant service's JSON chat endpoint.
//!
//! One `POST` per exchange, no streaming:
//! - request: the whole transcript as `{role, content}` pairs
//! - response: `{response, sources?}`
//!
//! Timeouts come from the reqwest client. None is set unless configured.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::inference::types::{ChatReply, ChatRequest, ServiceStatus};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_CHAT_PATH: &str = "/api/chat";

/// Assistant service reached over plain HTTP + JSON.
pub struct HttpProvider {
    base_url: String,
    chat_path: String,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Builds a provider for `base_url`. `chat_path` defaults to `/api/chat`.
    pub fn new(
        base_url: impl Into<String>,
        chat_path: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProviderError::Config(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        let chat_path = chat_path.unwrap_or_else(|| DEFAULT_CHAT_PATH.to_string());
        let chat_path = if chat_path.starts_with('/') {
            chat_path
        } else {
            format!("/{chat_path}")
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self {
            base_url,
            chat_path,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, self.chat_path)
    }

    /// Reads the body of a failed response, keeping the status for the log.
    async fn api_error(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Assistant service error: {} - {}", status, message);
        ProviderError::Api { status, message }
    }
}

#[async_trait]
impl CompletionProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<ChatReply, ProviderError> {
        let body = ChatRequest {
            messages: request.messages,
            domain: request.domain,
        };

        info!(
            "Chat request: url={}, messages={}, domain={:?}",
            self.chat_url(),
            body.messages.len(),
            body.domain
        );

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let reply: ChatReply =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        info!(
            "Chat reply: {} bytes, {} sources",
            reply.response.len(),
            reply.sources.as_ref().map_or(0, Vec::len)
        );
        Ok(reply)
    }

    async fn probe(&self) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let status: ServiceStatus = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(status.message)
    }
}
