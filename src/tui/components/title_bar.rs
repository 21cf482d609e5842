//! # TitleBar Component
//!
//! One-row bar at the top: application title, the status text kept by the
//! core (`Ready`, `Waiting for reply…`, probe result) and a `↓ New` marker
//! when the transcript has content below the viewport.
//!
//! Purely presentational. Props are struct fields so the component fits the
//! fixed `Component::render` signature.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::theme::THEME;

pub struct TitleBar<'a> {
    pub title: &'a str,
    pub status_message: &'a str,
    pub has_unseen_content: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(title: &'a str, status_message: &'a str, has_unseen_content: bool) -> Self {
        Self {
            title,
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'a> {
        let separator = Span::styled(" | ", THEME.secondary());
        let mut spans = vec![Span::styled(self.title, THEME.title())];
        if !self.status_message.is_empty() {
            spans.push(separator.clone());
            spans.push(Span::raw(self.status_message));
        }
        if self.has_unseen_content {
            spans.push(separator);
            spans.push(Span::styled("↓ New", THEME.title()));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(mut title_bar: TitleBar<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_title_and_status() {
        let text = rendered(TitleBar::new("Parley", "Waiting for reply…", false));
        assert!(text.contains("Parley"));
        assert!(text.contains("Waiting for reply"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn shows_unseen_marker() {
        let text = rendered(TitleBar::new("Parley", "Ready", true));
        assert!(text.contains("Ready"));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn empty_status_has_no_separator() {
        let text = rendered(TitleBar::new("Parley", "", false));
        assert!(text.contains("Parley"));
        assert!(!text.contains('|'));
    }
}
