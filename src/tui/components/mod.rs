//! # TUI Components
//!
//! Everything drawn on screen, one file per component.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built each frame from the data they show:
//! - `TitleBar`: title, status text, unseen-content marker
//! - `WelcomeView`: shown while the transcript is empty
//! - `Message` / `TypingIndicator`: one bubble
//!
//! ### Stateful Components (Event-Driven)
//!
//! A transient wrapper around `&mut` persistent state kept in `TuiState`:
//! - `MessageList` over `MessageListState`: scrollable transcript, the
//!   `ScrollOwner` the core's auto-scroll talks to
//! - `InputBox` / `DraftEditor` over `InputBoxState`: the draft editor
//!
//! Props are passed explicitly; no component reaches into `App` on its own.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs
//! ├── welcome.rs
//! ├── message.rs       (bubble + typing indicator)
//! ├── message_list.rs  (scroll view, layout cache, glide)
//! └── input_box/       (editor, cursor, wrapping)
//! ```

pub mod input_box;
pub mod message;
pub mod message_list;
mod title_bar;
mod welcome;

pub use input_box::{DraftEditor, InputBox, InputBoxState, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
pub use welcome::WelcomeView;
