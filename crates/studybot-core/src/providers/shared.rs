//! Provider-agnostic types shared across LLM backends.

use std::fmt;

use anyhow::{Context, Result};

use crate::model::Role;

/// Standard User-Agent header for studybot API requests.
pub const USER_AGENT: &str = concat!("studybot/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Config resolution helpers
// ============================================================================

/// Resolves an API key with precedence: config > env.
///
/// # Errors
/// Returns an error if neither source provides a non-empty key.
pub fn resolve_api_key(
    config_api_key: Option<&str>,
    env_var: &str,
    config_section: &str,
) -> Result<String> {
    if let Some(key) = config_api_key {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    let key = std::env::var(env_var).context(format!(
        "No API key available. Set {env_var} or api_key in [{config_section}]."
    ))?;
    let trimmed = key.trim();
    if trimmed.is_empty() {
        anyhow::bail!("No API key available. {env_var} is empty.");
    }
    Ok(trimmed.to_string())
}

/// Resolves a base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the chosen URL is malformed.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
    provider_name: &str,
) -> Result<String> {
    if let Ok(env_url) = std::env::var(env_var) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, provider_name)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, provider_name)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    Ok(default_url.to_string())
}

fn validate_url(url: &str, provider_name: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid {provider_name} base URL: {url}"))?;
    Ok(())
}

// ============================================================================
// Request / error types
// ============================================================================

/// One role-tagged turn sent to the generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Error categories for provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Missing, invalid or rejected API key.
    Auth,
    /// Non-success HTTP status or transport error.
    HttpStatus,
    /// Request timed out or the connection failed.
    Timeout,
    /// The API answered without any text.
    EmptyResponse,
    /// The response body could not be decoded.
    Parse,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderErrorKind::Auth => "auth",
            ProviderErrorKind::HttpStatus => "http_status",
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::EmptyResponse => "empty_response",
            ProviderErrorKind::Parse => "parse",
        };
        f.write_str(label)
    }
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds an error from an HTTP status and response body.
    ///
    /// 401/403 and bodies mentioning the API key are classified as `Auth`.
    pub fn http_status(status: u16, body: &str) -> Self {
        let detail = extract_error_message(body).unwrap_or_else(|| body.trim().to_string());
        let kind = if matches!(status, 401 | 403) || detail.contains("API key") {
            ProviderErrorKind::Auth
        } else {
            ProviderErrorKind::HttpStatus
        };
        Self::new(kind, format!("HTTP {status}: {detail}"))
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ProviderErrorKind::Auth
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ProviderError {}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Pulls `error.message` out of a Google-style JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Classifies a reqwest error into a `ProviderError`.
pub fn classify_reqwest_error(e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ProviderError::timeout(format!("Connection failed: {e}"))
    } else if e.is_decode() {
        ProviderError::new(ProviderErrorKind::Parse, format!("Invalid response body: {e}"))
    } else {
        ProviderError::new(ProviderErrorKind::HttpStatus, format!("Network error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_detects_api_key_errors() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = ProviderError::http_status(400, body);
        assert!(err.is_auth());
        assert!(err.message.contains("API key not valid"));
    }

    #[test]
    fn test_http_status_plain_server_error() {
        let err = ProviderError::http_status(503, "overloaded");
        assert_eq!(err.kind, ProviderErrorKind::HttpStatus);
        assert_eq!(err.message, "HTTP 503: overloaded");
    }

    #[test]
    fn test_forbidden_is_auth() {
        assert!(ProviderError::http_status(403, "").is_auth());
    }

    #[test]
    fn test_config_key_wins_over_env() {
        let key = resolve_api_key(Some("  from-config "), "STUDYBOT_TEST_UNSET_KEY", "gemini");
        assert_eq!(key.unwrap(), "from-config");
    }

    #[test]
    fn test_missing_key_is_error() {
        let key = resolve_api_key(None, "STUDYBOT_TEST_UNSET_KEY", "gemini");
        assert!(key.is_err());
    }

    #[test]
    fn test_base_url_from_config_is_validated() {
        let url = resolve_base_url(
            Some("http://localhost:9999/v1beta/"),
            "STUDYBOT_TEST_UNSET_URL",
            "https://default",
            "Gemini",
        )
        .unwrap();
        assert_eq!(url, "http://localhost:9999/v1beta");

        assert!(
            resolve_base_url(Some("not a url"), "STUDYBOT_TEST_UNSET_URL", "x", "Gemini").is_err()
        );
    }
}
