//! # Auto-Scroll
//!
//! Watches the transcript and the lifecycle, and asks the view to scroll to
//! its end whenever:
//!
//! - a turn is appended, or
//! - the lifecycle enters or leaves `InFlight` (the loading indicator behaves
//!   like a temporary extra turn at the bottom).
//!
//! The view is reached only through [`ScrollOwner`]; how it scrolls (and
//! whether it animates) is its business.

use tokio::sync::watch;

use crate::core::lifecycle::{LifecycleState, RequestLifecycle};
use crate::core::transcript::{TranscriptSnapshot, TranscriptStore};

/// Capability exposed by whatever hosts the rendered transcript.
pub trait ScrollOwner {
    fn scroll_to_end(&mut self);
}

pub struct AutoScroll {
    transcript: watch::Receiver<TranscriptSnapshot>,
    lifecycle: watch::Receiver<LifecycleState>,
    was_in_flight: bool,
}

impl AutoScroll {
    pub fn attach(store: &TranscriptStore, lifecycle: &RequestLifecycle) -> Self {
        Self {
            transcript: store.subscribe(),
            lifecycle: lifecycle.subscribe(),
            was_in_flight: lifecycle.state().is_in_flight(),
        }
    }

    /// Consumes pending notifications. True if any of them warrants a scroll.
    ///
    /// A closed channel (store dropped with its session) reads as "no change".
    pub fn poll(&mut self) -> bool {
        let mut wants_scroll = false;

        if self.transcript.has_changed().unwrap_or(false) {
            self.transcript.borrow_and_update();
            wants_scroll = true;
        }

        if self.lifecycle.has_changed().unwrap_or(false) {
            let in_flight = self.lifecycle.borrow_and_update().is_in_flight();
            if in_flight != self.was_in_flight {
                self.was_in_flight = in_flight;
                wants_scroll = true;
            }
        }

        wants_scroll
    }

    /// Polls and forwards a scroll request to `owner`. Returns whether it did.
    pub fn sync(&mut self, owner: &mut impl ScrollOwner) -> bool {
        let wants_scroll = self.poll();
        if wants_scroll {
            owner.scroll_to_end();
        }
        wants_scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::SessionId;
    use crate::inference::{ChatReply, Turn};

    #[derive(Default)]
    struct CountingOwner {
        scrolls: usize,
    }

    impl ScrollOwner for CountingOwner {
        fn scroll_to_end(&mut self) {
            self.scrolls += 1;
        }
    }

    #[test]
    fn quiet_until_something_changes() {
        let store = TranscriptStore::new();
        let lifecycle = RequestLifecycle::new(SessionId::next());
        let mut auto = AutoScroll::attach(&store, &lifecycle);
        let mut owner = CountingOwner::default();

        assert!(!auto.sync(&mut owner));
        assert_eq!(owner.scrolls, 0);
    }

    #[test]
    fn append_requests_scroll_once() {
        let mut store = TranscriptStore::new();
        let lifecycle = RequestLifecycle::new(SessionId::next());
        let mut auto = AutoScroll::attach(&store, &lifecycle);
        let mut owner = CountingOwner::default();

        store.append(Turn::user("hi"));
        assert!(auto.sync(&mut owner));
        assert!(!auto.sync(&mut owner));
        assert_eq!(owner.scrolls, 1);
    }

    #[test]
    fn loading_toggles_request_scroll() {
        let mut store = TranscriptStore::new();
        let mut lifecycle = RequestLifecycle::new(SessionId::next());
        let mut auto = AutoScroll::attach(&store, &lifecycle);
        let mut owner = CountingOwner::default();

        store.append(Turn::user("hi"));
        let request = lifecycle.send(&store.snapshot(), None).unwrap();
        assert!(auto.sync(&mut owner)); // append + entering InFlight
        assert_eq!(owner.scrolls, 1);

        lifecycle.settle(
            request.ticket,
            Ok(ChatReply {
                response: "hello".into(),
                sources: None,
            }),
            &mut store,
        );
        assert!(auto.sync(&mut owner)); // reply + leaving InFlight
        assert_eq!(owner.scrolls, 2);
    }

    #[test]
    fn dropped_session_reads_as_no_change() {
        let (store, lifecycle) = (TranscriptStore::new(), RequestLifecycle::new(SessionId::next()));
        let mut auto = AutoScroll::attach(&store, &lifecycle);
        drop(store);
        drop(lifecycle);
        assert!(!auto.poll());
    }
}
