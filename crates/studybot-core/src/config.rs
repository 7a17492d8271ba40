//! Configuration management for Studybot.
//!
//! Loads configuration from ${STUDYBOT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for Studybot configuration and data directories.
    //!
    //! STUDYBOT_HOME resolution order:
    //! 1. STUDYBOT_HOME environment variable (if set)
    //! 2. ~/.config/studybot (default)

    use std::path::PathBuf;

    use anyhow::{Context, Result};

    /// Returns the Studybot home directory.
    pub fn studybot_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("STUDYBOT_HOME")
            && !home.trim().is_empty()
        {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("studybot"))
            .context("Could not determine home directory; set STUDYBOT_HOME")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(studybot_home()?.join("config.toml"))
    }

    /// Returns the directory holding persisted user and session data.
    pub fn storage_dir() -> Result<PathBuf> {
        Ok(studybot_home()?.join("storage"))
    }

    /// Returns the directory for rolling log files.
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(studybot_home()?.join("logs"))
    }
}

/// Gemini provider settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key (falls back to `GEMINI_API_KEY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini model id
    pub model: String,

    pub temperature: f32,

    pub top_p: f32,

    /// Maximum tokens for replies (optional)
    pub max_output_tokens: Option<u32>,

    /// HTTP timeout for generation requests, in seconds
    pub request_timeout_secs: u64,

    pub gemini: GeminiSettings,
}

impl Config {
    pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
    const DEFAULT_TEMPERATURE: f32 = 0.8;
    const DEFAULT_TOP_P: f32 = 0.9;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path()?)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Returns the request timeout, or `None` when disabled (0).
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            temperature: Self::DEFAULT_TEMPERATURE,
            top_p: Self::DEFAULT_TOP_P,
            max_output_tokens: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            gemini: GeminiSettings::default(),
        }
    }
}
