//! # Actions
//!
//! Everything that can happen in a Parley session becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The service answers? That's `Action::ExchangeSettled { .. }`.
//!
//! `update()` takes the current state and an action, mutates the state,
//! and returns an `Effect` for the run loop to carry out. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::core::lifecycle::{ExchangeRequest, Settlement, Ticket};
use crate::core::state::{App, STATUS_FAILED, STATUS_READY, STATUS_WAITING};
use crate::inference::{ChatReply, ProviderError, Turn};

#[derive(Debug)]
pub enum Action {
    /// Submit the current draft.
    Submit,
    /// An exchange finished, successfully or not.
    ExchangeSettled {
        ticket: Ticket,
        outcome: Result<ChatReply, ProviderError>,
    },
    /// The startup liveness probe finished.
    ProbeFinished(Result<String, ProviderError>),
    /// Drop this session and start an empty one.
    NewSession,
    Quit,
}

/// Side effects requested by `update()`.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Run this exchange against the provider and report back.
    SpawnExchange(ExchangeRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit => submit(app),
        Action::ExchangeSettled { ticket, outcome } => {
            match app.lifecycle.settle(ticket, outcome, &mut app.transcript) {
                Settlement::Resolved => app.status_message = STATUS_READY.to_string(),
                Settlement::Failed => app.status_message = STATUS_FAILED.to_string(),
                Settlement::Stale => {}
            }
            Effect::None
        }
        Action::ProbeFinished(result) => {
            if !app.is_loading() {
                app.status_message = match result {
                    Ok(greeting) => format!("Connected: {greeting}"),
                    Err(e) => {
                        info!("Service probe failed: {}", e);
                        "Service unreachable".to_string()
                    }
                };
            }
            Effect::None
        }
        Action::NewSession => {
            info!("Starting new session (dropping {:?})", app.session);
            *app = app.restart();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// The submit gate. Rejections are silent: no state change, no effect.
fn submit(app: &mut App) -> Effect {
    if !app.can_submit() {
        debug!(
            "Submit ignored (blank={}, state={:?})",
            app.draft.is_blank(),
            app.lifecycle.state()
        );
        return Effect::None;
    }

    app.transcript.append(Turn::user(app.draft.text()));
    let snapshot = app.transcript.snapshot();
    match app.lifecycle.send(&snapshot, app.domain.as_deref()) {
        Some(request) => {
            app.draft.clear();
            app.status_message = STATUS_WAITING.to_string();
            Effect::SpawnExchange(request)
        }
        None => Effect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::{FALLBACK_MESSAGE, LifecycleState};
    use crate::inference::{Role, SourceRef};
    use crate::test_support::{reply, test_app};

    fn submit_text(app: &mut App, text: &str) -> Effect {
        app.draft.update(text);
        update(app, Action::Submit)
    }

    fn expect_request(effect: Effect) -> ExchangeRequest {
        match effect {
            Effect::SpawnExchange(request) => request,
            other => panic!("expected SpawnExchange, got {other:?}"),
        }
    }

    #[test]
    fn scenario_hello_resolves() {
        let mut app = test_app();

        let request = expect_request(submit_text(&mut app, "Hello"));
        assert_eq!(app.transcript.snapshot().turns(), &[Turn::user("Hello")]);
        assert_eq!(app.lifecycle.state(), LifecycleState::InFlight);
        assert!(app.draft.is_empty());

        update(
            &mut app,
            Action::ExchangeSettled {
                ticket: request.ticket,
                outcome: reply("Hi there!"),
            },
        );
        assert_eq!(
            app.transcript.snapshot().turns(),
            &[Turn::user("Hello"), Turn::assistant("Hi there!", None)]
        );
        assert_eq!(app.lifecycle.state(), LifecycleState::Idle);
        assert_eq!(app.status_message, STATUS_READY);
    }

    #[test]
    fn scenario_hello_fails_with_fallback() {
        let mut app = test_app();
        let request = expect_request(submit_text(&mut app, "Hello"));

        update(
            &mut app,
            Action::ExchangeSettled {
                ticket: request.ticket,
                outcome: Err(ProviderError::Network("timed out".into())),
            },
        );

        let snapshot = app.transcript.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.turns()[1].role, Role::Assistant);
        assert_eq!(snapshot.turns()[1].content, FALLBACK_MESSAGE);
        assert_eq!(app.lifecycle.state(), LifecycleState::Idle);
        assert_eq!(app.status_message, STATUS_FAILED);
    }

    #[test]
    fn blank_submission_changes_nothing() {
        let mut app = test_app();
        for blank in ["", "   ", "\n\t  \n"] {
            assert_eq!(submit_text(&mut app, blank), Effect::None);
            assert!(app.transcript.is_empty());
            assert_eq!(app.lifecycle.state(), LifecycleState::Idle);
        }
    }

    #[test]
    fn submit_while_in_flight_is_a_no_op_and_keeps_draft() {
        let mut app = test_app();
        expect_request(submit_text(&mut app, "first"));

        assert_eq!(submit_text(&mut app, "second"), Effect::None);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.lifecycle.state(), LifecycleState::InFlight);
        assert_eq!(app.draft.text(), "second");
    }

    #[test]
    fn request_carries_whole_transcript() {
        let mut app = test_app();
        let first = expect_request(submit_text(&mut app, "one"));
        update(
            &mut app,
            Action::ExchangeSettled {
                ticket: first.ticket,
                outcome: Ok(ChatReply {
                    response: "uno".into(),
                    sources: Some(vec![SourceRef(serde_json::json!({"title": "dict"}))]),
                }),
            },
        );

        let second = expect_request(submit_text(&mut app, "two"));
        let roles: Vec<Role> = second.messages.iter().map(|m| m.role).collect();
        let contents: Vec<&str> = second.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(contents, vec!["one", "uno", "two"]);
    }

    #[test]
    fn every_user_turn_is_answered_in_the_next_slot() {
        let mut app = test_app();
        let outcomes = [
            reply("a"),
            Err(ProviderError::Api {
                status: 502,
                message: "bad gateway".into(),
            }),
            reply("c"),
        ];

        for (i, outcome) in outcomes.into_iter().enumerate() {
            let request = expect_request(submit_text(&mut app, &format!("q{i}")));
            // A blank and an in-flight attempt in between must not disturb ordering.
            submit_text(&mut app, "   ");
            submit_text(&mut app, "too early");
            app.draft.clear();
            update(
                &mut app,
                Action::ExchangeSettled {
                    ticket: request.ticket,
                    outcome,
                },
            );
        }

        let snapshot = app.transcript.snapshot();
        let turns = snapshot.turns();
        assert_eq!(turns.len(), 6);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[test]
    fn reply_for_dropped_session_is_discarded() {
        let mut app = test_app();
        let request = expect_request(submit_text(&mut app, "Hello"));

        update(&mut app, Action::NewSession);
        assert!(app.shows_welcome());

        update(
            &mut app,
            Action::ExchangeSettled {
                ticket: request.ticket,
                outcome: reply("late"),
            },
        );
        assert!(app.transcript.is_empty());
        assert_eq!(app.lifecycle.state(), LifecycleState::Idle);
    }

    #[test]
    fn probe_result_updates_status_when_idle() {
        let mut app = test_app();
        update(&mut app, Action::ProbeFinished(Ok("running".into())));
        assert_eq!(app.status_message, "Connected: running");

        update(
            &mut app,
            Action::ProbeFinished(Err(ProviderError::Network("refused".into()))),
        );
        assert_eq!(app.status_message, "Service unreachable");
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
