//! View shell: top-level navigation between landing, auth and chat.
//!
//! The chat screen carries its user, so a chat without a signed-in user
//! cannot be represented.

use std::sync::Arc;

use crate::auth::AuthMode;
use crate::model::User;
use crate::session::SessionStore;
use crate::storage::{self, Loaded, Storage, USER_KEY};

/// The screen currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Auth { mode: AuthMode },
    Chat { user: User },
}

pub struct Shell {
    screen: Screen,
    storage: Arc<dyn Storage>,
    /// Set when hydration found and purged a malformed user.
    discarded_user: bool,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

impl Shell {
    /// Restores the signed-in user, if any.
    ///
    /// A persisted user that fails to parse or has blank fields is purged and
    /// the shell starts on the landing screen.
    pub fn hydrate(storage: Arc<dyn Storage>) -> Self {
        let loaded = load_user(storage.as_ref());
        let discarded_user = matches!(loaded, Loaded::Corrupt);
        let screen = match loaded {
            Loaded::Value(user) => {
                tracing::info!(user_id = %user.id, "Restored signed-in user");
                Screen::Chat { user }
            }
            Loaded::Missing | Loaded::Corrupt => Screen::Landing,
        };
        Self {
            screen,
            storage,
            discarded_user,
        }
    }

    pub fn discarded_user(&self) -> bool {
        self.discarded_user
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn user(&self) -> Option<&User> {
        match &self.screen {
            Screen::Chat { user } => Some(user),
            _ => None,
        }
    }

    /// Landing -> Auth.
    pub fn open_auth(&mut self, mode: AuthMode) -> bool {
        if self.screen != Screen::Landing {
            return false;
        }
        self.screen = Screen::Auth { mode };
        true
    }

    /// Switches the form shown on the auth screen.
    pub fn set_auth_mode(&mut self, mode: AuthMode) -> bool {
        let Screen::Auth { mode: current } = &mut self.screen else {
            return false;
        };
        *current = mode;
        true
    }

    /// Auth -> Landing.
    pub fn back(&mut self) -> bool {
        if !matches!(self.screen, Screen::Auth { .. }) {
            return false;
        }
        self.screen = Screen::Landing;
        true
    }

    /// Auth -> Chat. Persists the user.
    pub fn login(&mut self, user: User) -> bool {
        if !matches!(self.screen, Screen::Auth { .. }) {
            return false;
        }
        self.enter_chat(user);
        true
    }

    /// Landing -> Chat as a freshly synthesized guest.
    pub fn try_for_free(&mut self) -> bool {
        if self.screen != Screen::Landing {
            return false;
        }
        self.enter_chat(User::guest());
        true
    }

    /// Chat -> Landing. Removes the persisted user; sessions are kept.
    pub fn logout(&mut self) -> bool {
        if !matches!(self.screen, Screen::Chat { .. }) {
            return false;
        }
        if let Err(err) = self.storage.remove(USER_KEY) {
            tracing::warn!(error = %err, "Failed to remove persisted user");
        }
        self.screen = Screen::Landing;
        tracing::info!("Signed out");
        true
    }

    fn enter_chat(&mut self, user: User) {
        if let Err(err) = storage::save_json(self.storage.as_ref(), USER_KEY, &user) {
            tracing::warn!(error = %err, "Failed to persist user");
        }
        tracing::info!(user_id = %user.id, role = ?user.role, "Signed in");
        self.screen = Screen::Chat { user };
    }
}

/// Reads the persisted user, purging it when malformed.
///
/// `Loaded::Corrupt` means a value was present and has been removed.
pub fn load_user(storage: &dyn Storage) -> Loaded<User> {
    match storage::load_json::<User>(storage, USER_KEY) {
        Loaded::Missing => return Loaded::Missing,
        Loaded::Value(user) if user.is_valid() => return Loaded::Value(user),
        Loaded::Value(_) | Loaded::Corrupt => {}
    }
    tracing::warn!("Discarding malformed persisted user");
    if let Err(err) = storage.remove(USER_KEY) {
        tracing::warn!(error = %err, "Failed to purge persisted user");
    }
    Loaded::Corrupt
}

/// Hydrates the shell and the session store from the same storage.
///
/// A malformed persisted user invalidates the saved state as a whole: the
/// session list is reset to empty and the empty list is written back.
pub fn restore(storage: Arc<dyn Storage>) -> (Shell, SessionStore) {
    let shell = Shell::hydrate(Arc::clone(&storage));
    let mut store = SessionStore::load(storage);
    if shell.discarded_user() {
        tracing::warn!(
            count = store.sessions().len(),
            "Resetting sessions saved next to a malformed user"
        );
        store.clear();
    }
    (shell, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChatSession, UserRole};
    use crate::storage::{FileStorage, MemoryStorage, SESSIONS_KEY, save_json};

    fn student() -> User {
        User {
            id: "u1".to_string(),
            name: "ada".to_string(),
            email: "ada@school.edu".to_string(),
            role: UserRole::Student,
        }
    }

    #[test]
    fn test_starts_on_landing_without_user() {
        let shell = Shell::hydrate(Arc::new(MemoryStorage::new()));
        assert_eq!(shell.screen(), &Screen::Landing);
    }

    #[test]
    fn test_try_for_free_enters_chat_as_guest() {
        let storage = Arc::new(MemoryStorage::new());
        let mut shell = Shell::hydrate(Arc::<MemoryStorage>::clone(&storage));

        assert!(shell.try_for_free());

        let user = shell.user().unwrap();
        assert_eq!(user.role, UserRole::Guest);
        assert!(user.id.starts_with("guest-"));
        assert_eq!(user.name, User::GUEST_NAME);
        assert!(storage.contains(USER_KEY));
    }

    #[test]
    fn test_corrupted_user_is_purged_and_stays_on_landing() {
        let storage = Arc::new(MemoryStorage::with_entries([(USER_KEY, r#"{"id":null}"#)]));

        let shell = Shell::hydrate(Arc::<MemoryStorage>::clone(&storage));

        assert_eq!(shell.screen(), &Screen::Landing);
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_malformed_user_resets_saved_sessions() {
        let storage = Arc::new(MemoryStorage::with_entries([(USER_KEY, r#"{"id":null}"#)]));
        save_json(
            storage.as_ref(),
            SESSIONS_KEY,
            &vec![ChatSession::with_title("Biology")],
        )
        .unwrap();

        let (shell, store) = restore(Arc::<MemoryStorage>::clone(&storage));

        assert_eq!(shell.screen(), &Screen::Landing);
        assert!(shell.discarded_user());
        assert!(store.sessions().is_empty());
        assert_eq!(storage.get(SESSIONS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_user_keeps_saved_sessions() {
        let storage = Arc::new(MemoryStorage::new());
        save_json(
            storage.as_ref(),
            SESSIONS_KEY,
            &vec![ChatSession::with_title("Biology")],
        )
        .unwrap();

        let (shell, store) = restore(storage);

        assert!(!shell.discarded_user());
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn test_undecodable_user_file_is_purged() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path()));
        let path = storage.path_for(USER_KEY);
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let shell = Shell::hydrate(Arc::<FileStorage>::clone(&storage));

        assert_eq!(shell.screen(), &Screen::Landing);
        assert!(shell.discarded_user());
        assert!(!path.exists());
    }

    #[test]
    fn test_blank_user_fields_are_treated_as_malformed() {
        let raw = r#"{"id":"","name":"x","email":"x","role":"student"}"#;
        let storage = Arc::new(MemoryStorage::with_entries([(USER_KEY, raw)]));

        let shell = Shell::hydrate(Arc::<MemoryStorage>::clone(&storage));

        assert_eq!(shell.screen(), &Screen::Landing);
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_persisted_user_restores_chat() {
        let storage = Arc::new(MemoryStorage::new());
        save_json(storage.as_ref(), USER_KEY, &student()).unwrap();

        let shell = Shell::hydrate(storage);

        assert_eq!(shell.user(), Some(&student()));
    }

    #[test]
    fn test_auth_round_trip_and_logout() {
        let storage = Arc::new(MemoryStorage::new());
        let mut shell = Shell::hydrate(Arc::<MemoryStorage>::clone(&storage));

        assert!(shell.open_auth(AuthMode::Signup));
        assert!(shell.set_auth_mode(AuthMode::Login));
        assert_eq!(
            shell.screen(),
            &Screen::Auth {
                mode: AuthMode::Login
            }
        );
        assert!(shell.login(student()));
        assert!(storage.contains(USER_KEY));

        assert!(shell.logout());
        assert_eq!(shell.screen(), &Screen::Landing);
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        let mut shell = Shell::hydrate(Arc::new(MemoryStorage::new()));

        assert!(!shell.back());
        assert!(!shell.login(student()));
        assert!(!shell.logout());
        assert!(!shell.set_auth_mode(AuthMode::Forgot));

        shell.open_auth(AuthMode::Login);
        assert!(!shell.try_for_free());
        assert!(shell.back());
        assert_eq!(shell.screen(), &Screen::Landing);
    }
}
