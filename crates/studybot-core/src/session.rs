//! Session store: ordered chat sessions, the active pointer and the current
//! study mode.
//!
//! The store owns its persistence port. The session list is loaded once in
//! [`SessionStore::load`] and written back after every committed mutation.
//! Write failures are logged and otherwise ignored; the in-memory state stays
//! authoritative.

use std::sync::Arc;

use crate::model::{ChatSession, Message, StudyMode};
use crate::storage::{self, Loaded, SESSIONS_KEY, Storage};

pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active: Option<String>,
    mode: Option<StudyMode>,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .field("active", &self.active)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Rehydrates the store from `storage`.
    ///
    /// A corrupt session list is purged and the store starts empty.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let sessions = match storage::load_json::<Vec<ChatSession>>(storage.as_ref(), SESSIONS_KEY)
        {
            Loaded::Value(sessions) => dedup_by_id(sessions),
            Loaded::Missing => Vec::new(),
            Loaded::Corrupt => {
                if let Err(err) = storage.remove(SESSIONS_KEY) {
                    tracing::warn!(error = %err, "Failed to purge corrupt session list");
                }
                Vec::new()
            }
        };
        tracing::debug!(count = sessions.len(), "Loaded chat sessions");

        Self {
            sessions,
            active: None,
            mode: None,
            storage,
        }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn get(&self, session_id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.get(session_id).is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Returns the active session, if the pointer still resolves.
    pub fn active(&self) -> Option<&ChatSession> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn mode(&self) -> Option<StudyMode> {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Option<StudyMode>) {
        self.mode = mode;
    }

    /// Inserts a new empty session at the front and marks it active.
    pub fn create_session(&mut self, mode: Option<StudyMode>) -> String {
        let session = ChatSession::new(mode);
        self.mode = mode;
        self.insert_front(session)
    }

    /// Inserts a new empty session with an explicit title and marks it active.
    ///
    /// Leaves the current study mode untouched.
    pub fn create_titled_session(&mut self, title: impl Into<String>) -> String {
        self.insert_front(ChatSession::with_title(title))
    }

    fn insert_front(&mut self, session: ChatSession) -> String {
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active = Some(id.clone());
        self.persist();
        id
    }

    /// Changes the active pointer. Unknown ids are ignored.
    pub fn set_active(&mut self, session_id: &str) -> bool {
        if !self.contains(session_id) {
            return false;
        }
        self.active = Some(session_id.to_string());
        true
    }

    /// Clears the active pointer (the chat screen shows the mode picker).
    pub fn clear_active(&mut self) {
        self.active = None;
        self.mode = None;
    }

    /// Appends `message` to the session. A missing session is a no-op.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        let Some(session) = self.session_mut(session_id) else {
            tracing::debug!(session_id, "Dropping message for unknown session");
            return false;
        };
        session.messages.push(message);
        self.persist();
        true
    }

    /// Sets the title while the session has no messages yet.
    ///
    /// Returns false once the session has messages: titles are derived from
    /// the first message and never change afterwards.
    pub fn title_first_message(&mut self, session_id: &str, title: impl Into<String>) -> bool {
        let Some(session) = self.session_mut(session_id) else {
            return false;
        };
        if !session.is_empty() {
            return false;
        }
        session.title = title.into();
        self.persist();
        true
    }

    /// Removes every session and resets the pointers.
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.clear_active();
        self.persist();
    }

    fn session_mut(&mut self, session_id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }

    fn persist(&self) {
        if let Err(err) = storage::save_json(self.storage.as_ref(), SESSIONS_KEY, &self.sessions) {
            tracing::warn!(error = %err, "Failed to save chat sessions");
        }
    }
}

/// Keeps the first occurrence of each id so lookups stay unambiguous.
fn dedup_by_id(sessions: Vec<ChatSession>) -> Vec<ChatSession> {
    let mut seen = std::collections::HashSet::new();
    sessions
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect()
}
