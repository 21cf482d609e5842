//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::state::App;
use crate::inference::{ChatReply, CompletionProvider, CompletionRequest, ProviderError};

/// A provider for tests that never reach the network. Exchanges are settled
/// by hand through `update()`, so `complete` is never awaited in unit tests.
pub struct NoopProvider;

#[async_trait]
impl CompletionProvider for NoopProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<ChatReply, ProviderError> {
        Ok(ChatReply {
            response: String::new(),
            sources: None,
        })
    }
}

/// Creates a test App with a NoopProvider and no domain.
pub fn test_app() -> App {
    App::new(Arc::new(NoopProvider), None)
}

/// Shorthand for a successful, source-less reply.
pub fn reply(text: &str) -> Result<ChatReply, ProviderError> {
    Ok(ChatReply {
        response: text.to_string(),
        sources: None,
    })
}
