use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{InputBox, InputBoxState, MessageList, TitleBar, WelcomeView};

const PLACEHOLDER: &str = "Type a message… (Enter to send, Shift+Enter for a new line)";
const PLACEHOLDER_WAITING: &str = "Waiting for the reply, keep typing…";

/// Draw one frame: title bar / transcript / input box.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let input_height = InputBoxState::calculate_height(&app.draft, frame.area().width);
    let [title_area, main_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame.area());

    let snapshot = app.transcript.snapshot();
    let is_loading = app.is_loading();

    if app.shows_welcome() {
        WelcomeView {
            heading: &tui.display.welcome_heading,
            text: &tui.display.welcome_text,
            pulse: tui.pulse_value,
        }
        .render(frame, main_area);
    } else {
        MessageList {
            state: &mut tui.message_list,
            turns: snapshot.turns(),
            user_label: &tui.display.user_label,
            assistant_label: &tui.display.assistant_label,
            is_loading,
            frame_index: tui.frame_index,
        }
        .render(frame, main_area);
    }

    TitleBar::new(
        &tui.display.title,
        &app.status_message,
        !app.shows_welcome() && tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    InputBox {
        state: &mut tui.input_box,
        draft: &app.draft,
        placeholder: if is_loading { PLACEHOLDER_WAITING } else { PLACEHOLDER },
        waiting: is_loading,
    }
    .render(frame, input_area);
}
