//! # Transcript Store
//!
//! Append-only log of turns for one session, published as immutable
//! snapshots through a `watch` channel.
//!
//! ```text
//! append(turn) ──► new Arc<[Turn]> ──► watch::Sender ──► AutoScroll, view
//! ```
//!
//! Every append allocates a fresh turn list, so two snapshots are the same
//! transcript iff they point at the same list. Observers compare with
//! [`TranscriptSnapshot::same_as`] instead of walking the turns.

use std::sync::Arc;

use tokio::sync::watch;

use crate::inference::{Role, Turn};

/// Immutable view of the transcript at one point in time.
#[derive(Debug, Clone, Default)]
pub struct TranscriptSnapshot {
    turns: Arc<[Turn]>,
    revision: u64,
}

impl TranscriptSnapshot {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of appends that produced this snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when the last turn is a user turn still waiting for its reply.
    pub fn awaiting_reply(&self) -> bool {
        self.turns.last().is_some_and(|t| t.role == Role::User)
    }

    /// Identity comparison: same underlying turn list.
    pub fn same_as(&self, other: &TranscriptSnapshot) -> bool {
        Arc::ptr_eq(&self.turns, &other.turns)
    }
}

impl PartialEq for TranscriptSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// Owner of a session's transcript. Only `append` mutates it.
pub struct TranscriptStore {
    tx: watch::Sender<TranscriptSnapshot>,
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TranscriptSnapshot::default());
        Self { tx }
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Appends a turn and notifies every subscriber.
    pub fn append(&mut self, turn: Turn) {
        self.tx.send_modify(|snapshot| {
            let turns: Arc<[Turn]> = snapshot
                .turns
                .iter()
                .cloned()
                .chain(std::iter::once(turn))
                .collect();
            *snapshot = TranscriptSnapshot {
                turns,
                revision: snapshot.revision + 1,
            };
        });
    }

    /// New observer. The current snapshot counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<TranscriptSnapshot> {
        self.tx.subscribe()
    }
}
