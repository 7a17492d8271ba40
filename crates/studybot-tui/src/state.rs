//! Application state composition.
//!
//! ```text
//! AppState
//! ├── shell: Shell          (landing / auth / chat navigation)
//! ├── store: SessionStore   (sessions, active pointer, study mode)
//! ├── auth: AuthFormState   (auth form fields and notices)
//! ├── chat: ChatViewState   (input line, scroll, in-flight reply)
//! └── should_quit, spinner_frame, viewport
//! ```

use std::sync::Arc;

use studybot_core::session::SessionStore;
use studybot_core::shell::{self, Shell};
use studybot_core::storage::Storage;

use crate::auth::AuthFormState;
use crate::chat::ChatViewState;

/// Combined application state for the TUI.
#[derive(Debug)]
pub struct AppState {
    pub shell: Shell,
    pub store: SessionStore,
    pub auth: AuthFormState,
    pub chat: ChatViewState,
    pub should_quit: bool,
    /// Advanced on every tick; drives the loading spinner.
    pub spinner_frame: usize,
    /// Last known terminal size (width, height).
    pub viewport: (u16, u16),
}

impl AppState {
    /// Hydrates the shell and the session store from `storage`.
    pub fn hydrate(storage: Arc<dyn Storage>) -> Self {
        let (shell, store) = shell::restore(storage);
        Self {
            shell,
            store,
            auth: AuthFormState::default(),
            chat: ChatViewState::default(),
            should_quit: false,
            spinner_frame: 0,
            viewport: (0, 0),
        }
    }

    /// True while the active session waits for its reply.
    pub fn is_active_loading(&self) -> bool {
        self.chat
            .pending
            .as_deref()
            .is_some_and(|id| self.store.active_id() == Some(id))
    }
}
