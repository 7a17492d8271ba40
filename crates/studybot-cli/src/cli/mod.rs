//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use studybot_core::config;
use studybot_core::logging;
use studybot_core::model::StudyMode;

mod commands;

#[derive(Parser)]
#[command(name = "studybot")]
#[command(version = "0.1")]
#[command(about = "Student Chatbot: a study tutor in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sends one message to the tutor and prints the reply
    Ask {
        /// Study mode (notes, assignment, project, research, study, general)
        #[arg(short, long, default_value = "general")]
        mode: StudyMode,

        /// Continue an existing session by ID (default: start a new one)
        #[arg(short, long, value_name = "ID")]
        session: Option<String>,

        /// The message to send; empty sends the mode's starter prompt
        #[arg(value_name = "PROMPT", default_value = "")]
        prompt: String,
    },

    /// Manage saved study sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Sign out the persisted user (sessions are kept)
    Logout,
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists saved sessions, newest first
    List,
    /// Shows the transcript of a session
    Show {
        /// The ID of the session to show
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Deletes every saved session
    Clear,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // The guard flushes buffered log lines on exit.
    let _log_guard = config::paths::logs_dir()
        .ok()
        .and_then(|dir| logging::init(&dir));

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // default to the interactive app
    let Some(command) = cli.command else {
        return commands::chat::run(&config).await;
    };

    match command {
        Commands::Ask {
            mode,
            session,
            prompt,
        } => commands::ask::run(&config, mode, session.as_deref(), &prompt).await,

        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions::list(),
            SessionCommands::Show { id } => commands::sessions::show(&id),
            SessionCommands::Clear => commands::sessions::clear(),
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },

        Commands::Logout => commands::auth::logout(),
    }
}
