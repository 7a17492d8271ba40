//! One-shot ask command.
//!
//! Runs a single send through the composer and responder, prints the reply
//! on stdout and the session id on stderr.

use anyhow::{Context, Result};
use studybot_core::composer::{self, SendRequest};
use studybot_core::config::Config;
use studybot_core::model::StudyMode;

pub async fn run(
    config: &Config,
    mode: StudyMode,
    session: Option<&str>,
    prompt: &str,
) -> Result<()> {
    let (_, mut store) = super::restore_state()?;
    if let Some(id) = session
        && !store.contains(id)
    {
        anyhow::bail!("Session '{id}' not found");
    }

    let request = SendRequest {
        input: prompt,
        mode_override: Some(mode),
        session_override: session,
    };
    let turn = composer::begin_turn(&mut store, &request).context("compose message")?;

    let responder = super::gemini_responder(config)?;
    let reply = responder
        .respond(&turn.prompt, &turn.history, turn.mode)
        .await;
    composer::finish_turn(&mut store, &turn, reply.as_str());
    tracing::info!(
        session_id = %turn.session_id,
        mode = %turn.mode,
        model = responder.backend().model(),
        "Ask completed"
    );

    eprintln!("Session: {}", turn.session_id);
    println!("{reply}");
    Ok(())
}
