//! Auth screen key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use studybot_core::auth::{self, AuthMode, AuthOutcome};

use super::{AuthFormState, NoticeKind};
use crate::effects::UiEffect;
use crate::input;
use crate::state::AppState;

pub fn handle_auth_key(app: &mut AppState, mode: AuthMode, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            app.shell.back();
            app.auth = AuthFormState::default();
        }
        KeyCode::Tab | KeyCode::Down => app.auth.focus_next(mode),
        KeyCode::BackTab | KeyCode::Up => app.auth.focus_prev(mode),
        KeyCode::Char('f') if ctrl => switch_form(app, AuthMode::Forgot),
        KeyCode::Char('t') if ctrl => switch_form(app, mode.toggled()),
        KeyCode::Enter => submit(app, mode),
        _ => {
            let field = app.auth.focused_field(mode);
            input::handle_edit_key(app.auth.input_mut(field), key);
        }
    }
    vec![]
}

fn switch_form(app: &mut AppState, mode: AuthMode) {
    if app.shell.set_auth_mode(mode) {
        app.auth.switch_mode();
    }
}

fn submit(app: &mut AppState, mode: AuthMode) {
    let outcome = auth::submit(mode, &app.auth.credentials());
    tracing::debug!(?mode, outcome = %outcome, "Auth form submitted");

    match outcome {
        AuthOutcome::SignedIn(user) => {
            if app.shell.login(user) {
                app.auth = AuthFormState::default();
                app.store.clear_active();
            }
        }
        AuthOutcome::Switch { mode, notice } => {
            switch_form(app, mode);
            app.auth.set_notice(NoticeKind::Success, notice);
        }
        AuthOutcome::Rejected(reason) => app.auth.set_notice(NoticeKind::Error, reason),
    }
}
