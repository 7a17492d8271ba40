//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use studybot_core::shell::Screen;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{auth, chat, landing};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::ReplyReady { turn, reply } => chat::handle_reply_ready(app, &turn, reply),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            match app.shell.screen().clone() {
                Screen::Chat { .. } => app.chat.input.insert_str(&text),
                Screen::Auth { mode } => {
                    let field = app.auth.focused_field(mode);
                    app.auth.input_mut(field).insert_str(&text);
                }
                Screen::Landing => {}
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![UiEffect::Quit];
    }

    match app.shell.screen().clone() {
        Screen::Landing => landing::handle_landing_key(app, key),
        Screen::Auth { mode } => auth::handle_auth_key(app, mode, key),
        Screen::Chat { .. } => chat::handle_chat_key(app, key),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use studybot_core::auth::AuthMode;
    use studybot_core::model::{Role, StudyMode, UserRole};
    use studybot_core::storage::{MemoryStorage, SESSIONS_KEY, Storage, USER_KEY};

    use super::*;

    fn app() -> (AppState, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (
            AppState::hydrate(Arc::<MemoryStorage>::clone(&storage)),
            storage,
        )
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn chord(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))),
        )
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn guest_app() -> (AppState, Arc<MemoryStorage>) {
        let (mut app, storage) = app();
        press(&mut app, KeyCode::Char('g'));
        (app, storage)
    }

    fn take_turn(effects: Vec<UiEffect>) -> studybot_core::composer::PendingTurn {
        match effects.into_iter().next() {
            Some(UiEffect::RequestReply { turn }) => turn,
            other => panic!("expected RequestReply, got {other:?}"),
        }
    }

    #[test]
    fn test_try_for_free_from_landing() {
        let (app, storage) = guest_app();

        let user = app.shell.user().unwrap();
        assert_eq!(user.role, UserRole::Guest);
        assert!(user.id.starts_with("guest-"));
        assert!(storage.contains(USER_KEY));
    }

    #[test]
    fn test_enter_on_empty_input_is_noop() {
        let (mut app, _) = guest_app();

        let effects = press(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
        assert!(app.store.sessions().is_empty());
        assert!(app.chat.pending.is_none());
    }

    #[test]
    fn test_send_then_reply_lands_in_session() {
        let (mut app, storage) = guest_app();
        type_text(&mut app, "What is osmosis?");

        let turn = take_turn(press(&mut app, KeyCode::Enter));
        assert!(app.chat.input.is_empty());
        assert!(app.is_active_loading());
        assert_eq!(app.store.active().unwrap().title, "What is osmosis?");

        update(
            &mut app,
            UiEvent::ReplyReady {
                turn,
                reply: "Osmosis is...".to_string(),
            },
        );

        assert!(!app.is_active_loading());
        let messages = &app.store.active().unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Model);
        assert!(storage.get(SESSIONS_KEY).unwrap().contains("Osmosis is..."));
    }

    #[test]
    fn test_second_send_blocked_while_waiting() {
        let (mut app, _) = guest_app();
        type_text(&mut app, "first");
        take_turn(press(&mut app, KeyCode::Enter));

        type_text(&mut app, "second");
        assert!(press(&mut app, KeyCode::Enter).is_empty());
        assert!(press(&mut app, KeyCode::F(1)).is_empty());
        assert_eq!(app.store.sessions().len(), 1);
        assert_eq!(app.chat.input.text(), "second");
    }

    #[test]
    fn test_mode_key_starts_session_with_starter_prompt() {
        let (mut app, _) = guest_app();

        let turn = take_turn(press(&mut app, KeyCode::F(2)));

        assert_eq!(turn.mode, StudyMode::Assignment);
        assert_eq!(turn.prompt, StudyMode::Assignment.starter_prompt());
        assert_eq!(app.store.active().unwrap().title, "Assignment Session");
        assert_eq!(app.store.mode(), Some(StudyMode::Assignment));
    }

    #[test]
    fn test_late_reply_goes_to_its_own_session() {
        let (mut app, _) = guest_app();
        type_text(&mut app, "first topic");
        let turn = take_turn(press(&mut app, KeyCode::Enter));
        let first_id = turn.session_id.clone();

        chord(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        let second_id = app.store.active_id().unwrap().to_string();
        assert!(!app.is_active_loading());

        update(
            &mut app,
            UiEvent::ReplyReady {
                turn,
                reply: "late".to_string(),
            },
        );

        assert_eq!(app.store.get(&first_id).unwrap().messages.len(), 2);
        assert!(app.store.get(&second_id).unwrap().messages.is_empty());
        assert!(app.chat.pending.is_none());
    }

    #[test]
    fn test_alt_arrows_switch_sessions() {
        let (mut app, _) = guest_app();
        let older = app.store.create_session(None);
        let newer = app.store.create_session(None);

        chord(&mut app, KeyCode::Down, KeyModifiers::ALT);
        assert_eq!(app.store.active_id(), Some(older.as_str()));
        chord(&mut app, KeyCode::Down, KeyModifiers::ALT);
        assert_eq!(app.store.active_id(), Some(older.as_str()));
        chord(&mut app, KeyCode::Up, KeyModifiers::ALT);
        assert_eq!(app.store.active_id(), Some(newer.as_str()));
    }

    #[test]
    fn test_logout_returns_to_landing_and_keeps_sessions() {
        let (mut app, storage) = guest_app();
        app.store.create_session(None);

        chord(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);

        assert_eq!(app.shell.screen(), &Screen::Landing);
        assert!(!storage.contains(USER_KEY));
        assert_eq!(app.store.sessions().len(), 1);
        assert_eq!(app.store.active_id(), None);
    }

    #[test]
    fn test_login_form_flow() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(
            app.shell.screen(),
            &Screen::Auth {
                mode: AuthMode::Login
            }
        );

        press(&mut app, KeyCode::Enter);
        assert!(app.auth.notice.is_some());

        type_text(&mut app, "ada@school.edu");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "secret");
        press(&mut app, KeyCode::Enter);

        let user = app.shell.user().unwrap();
        assert_eq!(user.name, "ada");
        assert_eq!(user.role, UserRole::Student);
    }

    #[test]
    fn test_forgot_password_switches_to_verify() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('l'));
        chord(&mut app, KeyCode::Char('f'), KeyModifiers::CONTROL);
        type_text(&mut app, "ada@school.edu");

        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.shell.screen(),
            &Screen::Auth {
                mode: AuthMode::Verify
            }
        );
        assert!(app.auth.notice.is_some());
    }

    #[test]
    fn test_escape_leaves_auth_and_clears_form() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "Ada");

        press(&mut app, KeyCode::Esc);

        assert_eq!(app.shell.screen(), &Screen::Landing);
        assert!(app.auth.credentials().name.is_empty());
    }

    #[test]
    fn test_restored_user_and_sessions_on_startup() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut app = AppState::hydrate(Arc::<MemoryStorage>::clone(&storage));
            press(&mut app, KeyCode::Char('g'));
            type_text(&mut app, "kept");
            take_turn(press(&mut app, KeyCode::Enter));
        }

        let app = AppState::hydrate(Arc::<MemoryStorage>::clone(&storage));

        assert!(matches!(app.shell.screen(), Screen::Chat { .. }));
        assert_eq!(app.store.sessions().len(), 1);
        assert_eq!(app.store.sessions()[0].messages[0].content, "kept");
        assert!(storage.contains(USER_KEY));
    }

    #[test]
    fn test_malformed_user_on_startup_resets_sessions() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut app = AppState::hydrate(Arc::<MemoryStorage>::clone(&storage));
            press(&mut app, KeyCode::Char('g'));
            type_text(&mut app, "lost");
            take_turn(press(&mut app, KeyCode::Enter));
        }
        storage.set(USER_KEY, r#"{"id":null}"#).unwrap();

        let app = AppState::hydrate(Arc::<MemoryStorage>::clone(&storage));

        assert_eq!(app.shell.screen(), &Screen::Landing);
        assert!(app.store.sessions().is_empty());
        assert!(!storage.contains(USER_KEY));
        assert_eq!(storage.get(SESSIONS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_ctrl_c_quits_from_any_screen() {
        let (mut app, _) = app();
        let effects = chord(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(effects, vec![UiEffect::Quit]);
    }
}
