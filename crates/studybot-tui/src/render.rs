//! Pure view functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use studybot_core::shell::Screen;

use crate::state::AppState;
use crate::{auth, chat, landing};

/// Renders the current screen.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    match app.shell.screen() {
        Screen::Landing => landing::render_landing(frame, area),
        Screen::Auth { mode } => auth::render_auth(frame, area, &app.auth, *mode),
        Screen::Chat { user } => chat::render_chat(app, user, frame),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use studybot_core::storage::MemoryStorage;

    use super::*;

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_landing_shows_menu() {
        let app = AppState::hydrate(Arc::new(MemoryStorage::new()));
        let screen = draw(&app);
        assert!(screen.contains("Student Chatbot"));
        assert!(screen.contains("Try for free"));
    }

    #[test]
    fn test_chat_shows_mode_picker_and_sidebar() {
        let mut app = AppState::hydrate(Arc::new(MemoryStorage::new()));
        app.shell.try_for_free();

        let screen = draw(&app);

        assert!(screen.contains("What's our study goal today?"));
        assert!(screen.contains("No previous sessions"));
        assert!(screen.contains("Guest Learner"));
    }
}
