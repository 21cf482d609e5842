//! # Application State
//!
//! One `App` is one conversation session. It owns the transcript, the
//! lifecycle flag and the draft exclusively; nothing is shared across
//! sessions and nothing outlives the `App`.
//!
//! ```text
//! App
//! ├── session: SessionId                    // stamps every ticket
//! ├── provider: Arc<dyn CompletionProvider> // assistant service
//! ├── transcript: TranscriptStore           // append-only turns
//! ├── lifecycle: RequestLifecycle           // Idle / InFlight / ...
//! ├── draft: InputBuffer                    // text being composed
//! ├── auto_scroll: AutoScroll               // observer of the two above
//! ├── domain: Option<String>                // forwarded with each request
//! └── status_message: String                // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::input::InputBuffer;
use crate::core::lifecycle::{RequestLifecycle, SessionId};
use crate::core::scroll::AutoScroll;
use crate::core::transcript::TranscriptStore;
use crate::inference::CompletionProvider;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_WAITING: &str = "Waiting for reply…";
pub const STATUS_FAILED: &str = "Reply failed, see log";

pub struct App {
    pub session: SessionId,
    pub provider: Arc<dyn CompletionProvider>,
    pub transcript: TranscriptStore,
    pub lifecycle: RequestLifecycle,
    pub draft: InputBuffer,
    pub auto_scroll: AutoScroll,
    pub domain: Option<String>,
    pub status_message: String,
}

impl App {
    pub fn new(provider: Arc<dyn CompletionProvider>, domain: Option<String>) -> Self {
        let session = SessionId::next();
        let transcript = TranscriptStore::new();
        let lifecycle = RequestLifecycle::new(session);
        let auto_scroll = AutoScroll::attach(&transcript, &lifecycle);
        Self {
            session,
            provider,
            transcript,
            lifecycle,
            draft: InputBuffer::new(),
            auto_scroll,
            domain,
            status_message: String::from(STATUS_READY),
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        Self::new(provider, config.domain.clone())
    }

    /// A fresh session against the same service. The current one is dropped
    /// by the caller.
    pub fn restart(&self) -> Self {
        Self::new(self.provider.clone(), self.domain.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle.state().is_in_flight()
    }

    /// Whether submit is currently allowed.
    pub fn can_submit(&self) -> bool {
        self.draft.can_submit(self.lifecycle.state())
    }

    /// The empty transcript renders as a welcome view.
    pub fn shows_welcome(&self) -> bool {
        self.transcript.is_empty()
    }
}
