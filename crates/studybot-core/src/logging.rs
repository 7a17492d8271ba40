//! Tracing setup.
//!
//! Logs go to a daily rolling file under `${STUDYBOT_HOME}/logs` so they never
//! draw over the terminal UI. Filter precedence: `STUDYBOT_LOG` > "info".

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV_VAR: &str = "STUDYBOT_LOG";
const LOG_FILE_PREFIX: &str = "studybot.log";
const DEFAULT_FILTER: &str = "info";

/// Builds the env filter from `STUDYBOT_LOG`, falling back to "info".
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber writing into `logs_dir`.
///
/// The returned guard must stay alive for the program's lifetime so buffered
/// lines are flushed. Returns `None` (logging disabled) when the directory
/// cannot be created or a subscriber is already installed.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(err) = std::fs::create_dir_all(logs_dir) {
        eprintln!(
            "Warning: could not create log directory {}: {err}",
            logs_dir.display()
        );
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    Some(guard)
}
