//! Message composer: turns user input into a committed user message plus a
//! pending AI turn.
//!
//! A send is one transaction over the store. The outbound history is
//! snapshotted before the user message is appended, so the request never
//! sees its own prompt twice and never reads half-applied state.

use crate::model::{Message, StudyMode};
use crate::session::SessionStore;

/// Maximum number of characters of the prompt used as a session title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Input to [`begin_turn`].
#[derive(Debug, Clone, Default)]
pub struct SendRequest<'a> {
    /// Raw user input (trimmed by the composer).
    pub input: &'a str,
    /// Mode picked from a mode button; allows sending without typed input.
    pub mode_override: Option<StudyMode>,
    /// Explicit target session; defaults to the active session.
    pub session_override: Option<&'a str>,
}

impl<'a> SendRequest<'a> {
    pub fn typed(input: &'a str) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }
}

/// An AI request ready to be issued, tagged with its target session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub session_id: String,
    pub prompt: String,
    /// Session history as it was before the user message was appended.
    pub history: Vec<Message>,
    pub mode: StudyMode,
}

/// Appends the user message and returns the AI turn to run.
///
/// Returns `None` (and touches nothing) when the input is blank and no mode
/// was picked.
pub fn begin_turn(store: &mut SessionStore, request: &SendRequest<'_>) -> Option<PendingTurn> {
    let typed = request.input.trim();
    if typed.is_empty() && request.mode_override.is_none() {
        return None;
    }

    let mode = request
        .mode_override
        .or(store.mode())
        .unwrap_or_default();
    let prompt = if typed.is_empty() {
        mode.starter_prompt()
    } else {
        typed.to_string()
    };
    let title = derive_title(typed, mode);

    let target = request
        .session_override
        .or(store.active_id())
        .filter(|id| store.contains(id))
        .map(str::to_string);
    let session_id = match target {
        Some(id) => id,
        None => store.create_titled_session(title.clone()),
    };

    let history = store
        .get(&session_id)
        .map(|s| s.messages.clone())
        .unwrap_or_default();

    store.title_first_message(&session_id, title);
    store.append_message(&session_id, Message::user(prompt.clone()));
    if let Some(mode) = request.mode_override {
        store.set_mode(Some(mode));
    }

    tracing::debug!(
        session_id = %session_id,
        mode = %mode,
        history_len = history.len(),
        "Composed user turn"
    );

    Some(PendingTurn {
        session_id,
        prompt,
        history,
        mode,
    })
}

/// Starts a fresh session for `mode` and sends its starter prompt.
pub fn begin_mode_session(store: &mut SessionStore, mode: StudyMode) -> Option<PendingTurn> {
    let session_id = store.create_session(Some(mode));
    begin_turn(
        store,
        &SendRequest {
            input: "",
            mode_override: Some(mode),
            session_override: Some(&session_id),
        },
    )
}

/// Records the reply for `turn`. A session that vanished meanwhile is skipped.
pub fn finish_turn(store: &mut SessionStore, turn: &PendingTurn, reply: impl Into<String>) -> bool {
    store.append_message(&turn.session_id, Message::model(reply))
}

/// First [`TITLE_MAX_CHARS`] characters of the typed prompt, or the mode title.
pub fn derive_title(typed: &str, mode: StudyMode) -> String {
    if typed.is_empty() {
        mode.session_title()
    } else {
        typed.chars().take(TITLE_MAX_CHARS).collect()
    }
}
