//! Chat command handler.

use anyhow::{Context, Result};
use studybot_core::config::Config;

use crate::modes;

pub async fn run(config: &Config) -> Result<()> {
    let storage = super::open_storage()?;
    let responder = super::gemini_responder(config)?;

    modes::run_interactive(config, storage, responder)
        .await
        .context("interactive chat failed")?;

    Ok(())
}
