//! Chat screen reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use studybot_core::composer::{self, PendingTurn, SendRequest};
use studybot_core::model::StudyMode;

use super::render::chat_layout;
use super::transcript;
use crate::effects::UiEffect;
use crate::input;
use crate::state::AppState;

pub fn handle_chat_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('l') if ctrl => {
            logout(app);
            vec![]
        }
        KeyCode::Char('n') if ctrl => {
            app.store.create_session(None);
            app.chat.follow_latest();
            vec![]
        }
        KeyCode::Up if alt => {
            switch_session(app, -1);
            vec![]
        }
        KeyCode::Down if alt => {
            switch_session(app, 1);
            vec![]
        }
        KeyCode::PageUp => {
            scroll(app, true);
            vec![]
        }
        KeyCode::PageDown => {
            scroll(app, false);
            vec![]
        }
        KeyCode::F(n @ 1..=5) => {
            let mode = StudyMode::starters()[usize::from(n) - 1];
            start_mode_session(app, mode)
        }
        KeyCode::Enter => send_typed(app),
        _ => {
            input::handle_edit_key(&mut app.chat.input, key);
            vec![]
        }
    }
}

/// Records a finished reply in the session it was requested for.
pub fn handle_reply_ready(app: &mut AppState, turn: &PendingTurn, reply: String) -> Vec<UiEffect> {
    let recorded = composer::finish_turn(&mut app.store, turn, reply);
    if !recorded {
        tracing::debug!(session_id = %turn.session_id, "Reply arrived for a removed session");
    }
    if app.chat.pending.as_deref() == Some(turn.session_id.as_str()) {
        app.chat.pending = None;
    }
    if app.store.active_id() == Some(turn.session_id.as_str()) {
        app.chat.follow_latest();
    }
    vec![]
}

fn send_typed(app: &mut AppState) -> Vec<UiEffect> {
    if app.chat.is_waiting() {
        return vec![];
    }
    let request = SendRequest::typed(app.chat.input.text());
    let Some(turn) = composer::begin_turn(&mut app.store, &request) else {
        return vec![];
    };
    app.chat.input.clear();
    request_reply(app, turn)
}

fn start_mode_session(app: &mut AppState, mode: StudyMode) -> Vec<UiEffect> {
    if app.chat.is_waiting() {
        return vec![];
    }
    match composer::begin_mode_session(&mut app.store, mode) {
        Some(turn) => request_reply(app, turn),
        None => vec![],
    }
}

fn request_reply(app: &mut AppState, turn: PendingTurn) -> Vec<UiEffect> {
    app.chat.pending = Some(turn.session_id.clone());
    app.chat.follow_latest();
    vec![UiEffect::RequestReply { turn }]
}

fn logout(app: &mut AppState) {
    if app.shell.logout() {
        app.store.clear_active();
        app.chat.input.clear();
        app.chat.follow_latest();
    }
}

/// Moves the active pointer through the sidebar list. `-1` is up (newer).
fn switch_session(app: &mut AppState, step: isize) {
    let ids: Vec<String> = app.store.sessions().iter().map(|s| s.id.clone()).collect();
    if ids.is_empty() {
        return;
    }
    let current = app
        .store
        .active_id()
        .and_then(|active| ids.iter().position(|id| id == active));
    let next = match current {
        Some(i) => i.saturating_add_signed(step).min(ids.len() - 1),
        None => 0,
    };
    app.store.set_active(&ids[next]);
    app.chat.follow_latest();
}

fn scroll(app: &mut AppState, up: bool) {
    let (width, height) = app.viewport;
    let layout = chat_layout(Rect::new(0, 0, width, height));
    let page = usize::from(layout.transcript.height / 2).max(1);

    if up {
        let total = app.store.active().map_or(0, |session| {
            transcript::build_lines(&session.messages, usize::from(layout.transcript.width)).len()
        });
        let max_scroll = total.saturating_sub(usize::from(layout.transcript.height));
        app.chat.scroll = (app.chat.scroll + page).min(max_scroll);
    } else {
        app.chat.scroll = app.chat.scroll.saturating_sub(page);
    }
}
