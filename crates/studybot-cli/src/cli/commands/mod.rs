//! CLI command handlers.

use std::sync::Arc;

use anyhow::Result;
use studybot_core::config::{Config, paths};
use studybot_core::providers::{GeminiClient, GeminiConfig};
use studybot_core::responder::Responder;
use studybot_core::session::SessionStore;
use studybot_core::shell::{self, Shell};
use studybot_core::storage::{FileStorage, Storage};

pub mod ask;
pub mod auth;
pub mod chat;
pub mod config;
pub mod sessions;

/// Opens the on-disk store under `${STUDYBOT_HOME}/storage`.
fn open_storage() -> Result<Arc<dyn Storage>> {
    Ok(Arc::new(FileStorage::new(paths::storage_dir()?)))
}

/// Loads the persisted user and sessions the same way the chat app does.
fn restore_state() -> Result<(Shell, SessionStore)> {
    Ok(shell::restore(open_storage()?))
}

fn gemini_responder(config: &Config) -> Result<Responder<GeminiClient>> {
    let gemini = GeminiConfig::from_config(config)?;
    Ok(Responder::new(GeminiClient::new(gemini)))
}
