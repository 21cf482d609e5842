//! # Core Application Logic
//!
//! Everything Parley knows about a conversation, with no knowledge of the
//! terminal it happens to be drawn on.
//!
//! ```text
//!                    ┌──────────────────────────────┐
//!                    │            CORE              │
//!                    │                              │
//!                    │  • TranscriptStore (turns)   │
//!                    │  • RequestLifecycle (flag)   │
//!                    │  • InputBuffer (draft)       │
//!                    │  • AutoScroll (observer)     │
//!                    │  • update() (reducer)        │
//!                    │                              │
//!                    │  No terminal. No sockets.    │
//!                    └──────────────┬───────────────┘
//!                                   │ Effect::SpawnExchange
//!                   ┌───────────────┴───────────────┐
//!                   ▼                               ▼
//!            ┌────────────┐                 ┌──────────────┐
//!            │    TUI     │                 │  inference   │
//!            │  Adapter   │ ──── spawns ──► │ HttpProvider │
//!            │ (ratatui)  │                 │  (reqwest)   │
//!            └────────────┘                 └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, one per session
//! - [`action`]: The `Action` enum and `update()`
//! - [`transcript`]: Append-only turn history with immutable snapshots
//! - [`lifecycle`]: Single-flight request cycle and ticketed settlement
//! - [`input`]: Draft text and the submission gate
//! - [`scroll`]: Scroll-to-end requests driven by the two stores
//! - [`config`]: File, environment and CLI configuration

pub mod action;
pub mod config;
pub mod input;
pub mod lifecycle;
pub mod scroll;
pub mod state;
pub mod transcript;
