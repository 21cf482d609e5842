//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//!  terminal events ──► TuiEvent ──► components / Action ──► update() ──► Effect
//!                                                                          │
//!  tokio task ◄──────────────────── SpawnExchange ◄────────────────────────┘
//!       │
//!       └─► mpsc ──► Action::ExchangeSettled ──► update()
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Animating** (welcome pulse, typing indicator, scroll glide): draws
//!   every ~80ms.
//! - **Idle**: sleeps up to 500ms and only redraws on events.
//!
//! A `SteadyBlock` cursor is used because ratatui's `set_cursor_position`
//! resets the terminal's blink timer on every `draw()`, which makes blinking
//! cursors flicker during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::{self, stdout};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::{DisplaySettings, ResolvedConfig};
use crate::core::lifecycle::ExchangeRequest;
use crate::core::state::App;
use crate::inference::{CompletionProvider, HttpProvider};
use crate::tui::component::EventHandler;
use crate::tui::components::{DraftEditor, InputBoxState, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const FRAME_INTERVAL: Duration = Duration::from_millis(80);
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBoxState,
    pub display: DisplaySettings,
    // Animation state
    pub pulse_value: f32,
    pub frame_index: usize,
}

impl TuiState {
    pub fn new(display: DisplaySettings) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBoxState::new(),
            display,
            pulse_value: 0.0,
            frame_index: 0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart from Enter.
        // Terminals without it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the HTTP provider described by `config`.
pub fn build_provider(config: &ResolvedConfig) -> io::Result<Arc<dyn CompletionProvider>> {
    let provider = HttpProvider::new(
        config.base_url.clone(),
        Some(config.chat_path.clone()),
        config.timeout,
    )
    .map_err(io::Error::other)?;
    info!("Using assistant service at {}", provider.chat_url());
    Ok(Arc::new(provider))
}

pub fn run(config: ResolvedConfig) -> io::Result<()> {
    let provider = build_provider(&config)?;
    let mut app = App::from_config(provider, &config);
    let mut tui = TuiState::new(config.display.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_probe(app.provider.clone(), tx.clone());

    let start_time = Instant::now();
    let mut needs_redraw = true;

    let result = loop {
        // Forward transcript/lifecycle changes to the view as scroll requests
        if app.auto_scroll.sync(&mut tui.message_list) {
            needs_redraw = true;
        }

        let animating = app.is_loading() || app.shows_welcome() || tui.message_list.gliding;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 3.0).sin() * 0.5 + 0.5;
            tui.frame_index = (elapsed * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if animating { FRAME_INTERVAL } else { IDLE_INTERVAL };
        let events = match collect_events(timeout) {
            Ok(events) => events,
            Err(e) => break Err(e),
        };
        if !events.is_empty() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in events {
            match event {
                TuiEvent::Resize => {}
                TuiEvent::Quit => should_quit |= update(&mut app, Action::Quit) == Effect::Quit,
                TuiEvent::NewSession => {
                    update(&mut app, Action::NewSession);
                    tui.message_list = MessageListState::new();
                    tui.input_box = InputBoxState::new();
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                }
                _ => {
                    let edited = DraftEditor {
                        state: &mut tui.input_box,
                        draft: &mut app.draft,
                    }
                    .handle_event(&event);
                    if edited == Some(InputEvent::Submit) {
                        let effect = update(&mut app, Action::Submit);
                        should_quit |= dispatch(effect, &app, &tx);
                    }
                }
            }
        }

        if should_quit {
            break Ok(());
        }

        // Settlements and probe results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            should_quit |= dispatch(effect, &app, &tx);
        }

        if should_quit {
            break Ok(());
        }
    };

    ratatui::restore();
    result
}

/// Drain every pending terminal event, waiting up to `timeout` for the first.
fn collect_events(timeout: Duration) -> io::Result<Vec<TuiEvent>> {
    let mut events = Vec::new();
    if let Some(first) = poll_event_timeout(timeout)? {
        events.push(first);
        while let Some(next) = poll_event_immediate()? {
            events.push(next);
        }
    }
    Ok(events)
}

/// Carry out an effect. Returns true when the app should quit.
fn dispatch(effect: Effect, app: &App, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnExchange(request) => {
            spawn_exchange(app.provider.clone(), request, tx.clone());
            false
        }
    }
}

/// Run one exchange on the runtime and report the settlement back to the
/// loop. The request is fully owned so the task outlives nothing it borrows.
pub fn spawn_exchange(
    provider: Arc<dyn CompletionProvider>,
    request: ExchangeRequest,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Spawning exchange {} via {} ({} messages)",
        request.ticket,
        provider.name(),
        request.messages.len()
    );
    tokio::spawn(async move {
        let started = Instant::now();
        let outcome = provider.complete(request.as_request()).await;
        debug!(
            "Exchange {} finished in {}ms (ok={})",
            request.ticket,
            started.elapsed().as_millis(),
            outcome.is_ok()
        );
        let ticket = request.ticket;
        if tx.send(Action::ExchangeSettled { ticket, outcome }).is_err() {
            warn!("Failed to deliver settlement {}: receiver dropped", ticket);
        }
    })
}

fn spawn_probe(provider: Arc<dyn CompletionProvider>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let result = provider.probe().await;
        match &result {
            Ok(message) => info!("Service probe: {}", message),
            Err(e) => warn!("Service probe failed: {}", e),
        }
        if tx.send(Action::ProbeFinished(result)).is_err() {
            debug!("Probe result dropped: receiver gone");
        }
    });
}
