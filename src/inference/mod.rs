pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use providers::HttpProvider;
pub use types::{ChatReply, ChatRequest, OutboundMessage, Role, SourceRef, Turn};
