//! Conversation and wire types shared by the core and the providers.
//!
//! `Turn` is the domain unit kept in the transcript. `OutboundMessage`,
//! `ChatRequest` and `ChatReply` mirror the JSON exchanged with the
//! assistant service:
//!
//! ```text
//! POST /api/chat   { "messages": [{ "role": "user", "content": "..." }], "domain"?: "..." }
//! 200 OK           { "response": "...", "sources"?: [ {...}, ... ] | null }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A citation descriptor attached to an assistant reply.
///
/// The service returns these as free-form JSON, so the raw value is kept
/// as-is and only interpreted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(pub Value);

impl SourceRef {
    /// Keys probed (in order) when picking a display label.
    const LABEL_KEYS: [&'static str; 3] = ["title", "url", "source"];

    /// Best-effort human-readable label for this source.
    ///
    /// Plain strings are their own label. Objects are probed for `title`,
    /// `url` and `source`, first at the top level and then under `metadata`.
    pub fn label(&self) -> Option<&str> {
        match &self.0 {
            Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
            Value::Object(_) => Self::probe(&self.0)
                .or_else(|| self.0.get("metadata").and_then(Self::probe)),
            _ => None,
        }
    }

    fn probe(value: &Value) -> Option<&str> {
        Self::LABEL_KEYS
            .iter()
            .filter_map(|key| value.get(*key).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty())
    }
}

/// One message in the exchange.
///
/// Turns are immutable once appended to the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    /// Markdown text, rendered by the presentation layer.
    pub content: String,
    /// Present only on successful assistant replies that cited something.
    pub sources: Option<Vec<SourceRef>>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
        }
    }

    /// Builds an assistant turn. An empty source list is normalized to `None`.
    pub fn assistant(content: impl Into<String>, sources: Option<Vec<SourceRef>>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: sources.filter(|s| !s.is_empty()),
        }
    }

    /// Labels of the sources that have one, in reply order.
    pub fn source_labels(&self) -> Vec<&str> {
        self.sources
            .iter()
            .flatten()
            .filter_map(SourceRef::label)
            .collect()
    }
}

/// A turn as sent to the service. Sources never go outbound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for OutboundMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Request body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [OutboundMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<&'a str>,
}

/// Successful reply from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
}

impl ChatReply {
    pub fn into_turn(self) -> Turn {
        Turn::assistant(self.response, self.sources)
    }
}

/// Body of the service's root liveness endpoint.
#[derive(Debug, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}
