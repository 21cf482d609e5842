//! # Request Lifecycle
//!
//! Drives one request/response cycle at a time.
//!
//! ```text
//!          send()              reply
//!   Idle ─────────► InFlight ─────────► Resolved ──► Idle
//!                      │
//!                      └──────────────► Failed ────► Idle
//!                          any error
//! ```
//!
//! `Resolved` and `Failed` are passed through inside `settle()` and replaced
//! by `Idle` before it returns. Watch receivers only keep the latest value,
//! so observers see `InFlight → Idle`. The outcome of a cycle is recorded in
//! the returned [`Settlement`], not in the published state.
//!
//! `send()` while `InFlight` is refused. That single flag is the whole
//! backpressure story: replies are applied in submission order because a
//! second request cannot leave until the first one settles.
//!
//! Every dispatched request carries a [`Ticket`]. A settlement is applied
//! only if its ticket matches the outstanding one, so a reply for a session
//! that has since been replaced, or for a cycle that already settled, is
//! dropped instead of corrupting the transcript.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::core::transcript::{TranscriptSnapshot, TranscriptStore};
use crate::inference::{ChatReply, CompletionRequest, OutboundMessage, ProviderError, Turn};

/// Text shown in place of a reply whenever an exchange fails.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again later.";

/// The assistant turn appended when an exchange fails.
pub fn fallback_turn() -> Turn {
    Turn::assistant(FALLBACK_MESSAGE, None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    InFlight,
    Resolved,
    Failed,
}

impl LifecycleState {
    pub fn is_in_flight(self) -> bool {
        self == LifecycleState::InFlight
    }
}

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies one dispatched exchange: which session, which cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub session: SessionId,
    pub cycle: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}#{}", self.session.0, self.cycle)
    }
}

/// A request ready to hand to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRequest {
    pub ticket: Ticket,
    pub messages: Vec<OutboundMessage>,
    pub domain: Option<String>,
}

impl ExchangeRequest {
    pub fn as_request(&self) -> CompletionRequest<'_> {
        CompletionRequest {
            messages: &self.messages,
            domain: self.domain.as_deref(),
        }
    }
}

/// What happened to a settlement handed to [`RequestLifecycle::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Reply appended.
    Resolved,
    /// Fallback turn appended; details went to the log.
    Failed,
    /// Ticket did not match the outstanding request; nothing changed.
    Stale,
}

pub struct RequestLifecycle {
    session: SessionId,
    state: watch::Sender<LifecycleState>,
    cycles: u64,
    outstanding: Option<Ticket>,
}

impl RequestLifecycle {
    pub fn new(session: SessionId) -> Self {
        let (state, _rx) = watch::channel(LifecycleState::Idle);
        Self {
            session,
            state,
            cycles: 0,
            outstanding: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// New observer of state transitions. The current state counts as seen.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Starts a cycle for `snapshot`. Returns `None` if one is already in flight.
    pub fn send(
        &mut self,
        snapshot: &TranscriptSnapshot,
        domain: Option<&str>,
    ) -> Option<ExchangeRequest> {
        if self.state().is_in_flight() {
            debug!("Send refused: cycle {:?} still in flight", self.outstanding);
            return None;
        }

        self.cycles += 1;
        let ticket = Ticket {
            session: self.session,
            cycle: self.cycles,
        };
        self.outstanding = Some(ticket);
        self.state.send_replace(LifecycleState::InFlight);
        info!("Exchange {} dispatched with {} turns", ticket, snapshot.len());

        Some(ExchangeRequest {
            ticket,
            messages: snapshot.turns().iter().map(OutboundMessage::from).collect(),
            domain: domain.map(str::to_string),
        })
    }

    /// Applies the outcome of `ticket` to `store`, then returns to `Idle`.
    /// The returned [`Settlement`] is the only lasting record of how the
    /// cycle ended.
    ///
    /// The reply is appended to the store as it is *now*, not to the
    /// snapshot the request was built from.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<ChatReply, ProviderError>,
        store: &mut TranscriptStore,
    ) -> Settlement {
        if self.outstanding != Some(ticket) {
            debug!(
                "Discarding stale settlement {} (outstanding: {:?})",
                ticket, self.outstanding
            );
            return Settlement::Stale;
        }
        self.outstanding = None;

        let (settlement, state) = match outcome {
            Ok(reply) => {
                info!("Exchange {} resolved", ticket);
                store.append(reply.into_turn());
                (Settlement::Resolved, LifecycleState::Resolved)
            }
            Err(e) => {
                warn!("Exchange {} failed: {}", ticket, e);
                store.append(fallback_turn());
                (Settlement::Failed, LifecycleState::Failed)
            }
        };

        self.state.send_replace(state);
        self.state.send_replace(LifecycleState::Idle);
        settlement
    }
}
