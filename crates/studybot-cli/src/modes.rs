//! Interactive mode entry point (optional `tui` feature).

#[cfg(feature = "tui")]
pub use studybot_tui::run_interactive;

#[cfg(not(feature = "tui"))]
pub async fn run_interactive<G: studybot_core::providers::Generate + 'static>(
    _config: &studybot_core::config::Config,
    _storage: std::sync::Arc<dyn studybot_core::storage::Storage>,
    _responder: studybot_core::responder::Responder<G>,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
