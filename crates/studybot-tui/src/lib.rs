//! Full-screen TUI for studybot.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
pub use features::{auth, chat, input, landing};
pub use runtime::TuiRuntime;
use studybot_core::config::Config;
use studybot_core::providers::Generate;
use studybot_core::responder::Responder;
use studybot_core::storage::Storage;

/// Runs the interactive app until the user quits.
///
/// # Errors
/// Returns an error if stderr is not a terminal or the terminal fails.
pub async fn run_interactive<G: Generate + 'static>(
    config: &Config,
    storage: Arc<dyn Storage>,
    responder: Responder<G>,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The study chat requires a terminal.\n\
             Use `studybot ask --mode <MODE> '...'` for non-interactive use."
        );
    }

    // Pre-TUI info, replaced by the alternate screen.
    let mut err = stderr();
    writeln!(err, "Student Chatbot")?;
    writeln!(err, "Model: {}", config.model)?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(storage, responder)?;
    tracing::info!(
        sessions = runtime.state.store.sessions().len(),
        "Interactive session started"
    );
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
