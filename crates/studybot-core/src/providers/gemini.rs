//! Gemini API key provider (Generative Language API).

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

use super::Generate;
use super::shared::{
    ProviderError, ProviderErrorKind, ProviderResult, Turn, USER_AGENT, classify_reqwest_error,
    resolve_api_key, resolve_base_url,
};
use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling parameters sent as `generationConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: Option<u32>,
}

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` when no key is configured; requests then fail with `Auth`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub sampling: SamplingParams,
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Creates a config from the loaded config file plus environment.
    ///
    /// Authentication resolution order:
    /// 1. `[gemini] api_key` from the config file
    /// 2. `GEMINI_API_KEY` environment variable
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY` (fallback if not in config)
    /// - `GEMINI_BASE_URL` (optional, wins over config)
    ///
    /// # Errors
    /// Returns an error if the configured base URL is malformed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key =
            match resolve_api_key(config.gemini.api_key.as_deref(), "GEMINI_API_KEY", "gemini") {
                Ok(key) => Some(key),
                Err(err) => {
                    tracing::warn!("{err}");
                    None
                }
            };
        let base_url = resolve_base_url(
            config.gemini.base_url.as_deref(),
            "GEMINI_BASE_URL",
            DEFAULT_BASE_URL,
            "Gemini",
        )?;

        Ok(Self {
            api_key,
            base_url,
            model: config.model.clone(),
            sampling: SamplingParams {
                temperature: config.temperature,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
            timeout: config.request_timeout(),
        })
    }
}

/// Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Falling back to default HTTP client");
            reqwest::Client::new()
        });
        Self { config, http }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(
        &self,
        turns: &[Turn],
        system_instruction: &str,
    ) -> ProviderResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ProviderError::new(
                ProviderErrorKind::Auth,
                "No API key configured. Set GEMINI_API_KEY or api_key in [gemini].",
            ));
        };

        let request = build_generate_request(turns, system_instruction, &self.config.sampling);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        tracing::debug!(model = %self.config.model, turns = turns.len(), "Sending Gemini request");

        let response = self
            .http
            .post(&url)
            .headers(build_headers(api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        if !status.is_success() {
            return Err(ProviderError::http_status(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::Parse,
                format!("Failed to parse Gemini response JSON: {e}"),
            )
        })?;
        parse_generate_response(&value)
    }
}

impl Generate for GeminiClient {
    async fn generate(&self, turns: &[Turn], system_instruction: &str) -> ProviderResult<String> {
        self.generate_content(turns, system_instruction).await
    }
}

/// Builds the `generateContent` request body.
pub fn build_generate_request(
    turns: &[Turn],
    system_instruction: &str,
    sampling: &SamplingParams,
) -> Value {
    let contents: Vec<Value> = turns
        .iter()
        .map(|turn| {
            json!({
                "role": turn.role.as_str(),
                "parts": [{ "text": turn.text }]
            })
        })
        .collect();

    let mut generation_config = json!({
        "temperature": sampling.temperature,
        "topP": sampling.top_p,
    });
    if let Some(max) = sampling.max_output_tokens
        && max > 0
    {
        generation_config["maxOutputTokens"] = json!(max);
    }

    let mut request = json!({
        "contents": contents,
        "generationConfig": generation_config,
    });
    if !system_instruction.trim().is_empty() {
        request["systemInstruction"] = json!({
            "parts": [{ "text": system_instruction }]
        });
    }
    request
}

/// Extracts the reply text from a `generateContent` response.
///
/// # Errors
/// Returns `EmptyResponse` when no candidate carries text.
pub fn parse_generate_response(value: &Value) -> ProviderResult<String> {
    let text: String = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = value
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .map_or_else(String::new, |r| format!(" (blocked: {r})"));
        return Err(ProviderError::new(
            ProviderErrorKind::EmptyResponse,
            format!("Empty response from Gemini API{reason}"),
        ));
    }
    Ok(text)
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("user-agent", HeaderValue::from_static(USER_AGENT));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampling() -> SamplingParams {
        SamplingParams {
            temperature: 0.8,
            top_p: 0.9,
            max_output_tokens: None,
        }
    }

    #[test]
    fn test_build_request_maps_roles_and_system_instruction() {
        let turns = vec![Turn::user("A"), Turn::model("B"), Turn::user("C")];
        let request = build_generate_request(&turns, "be nice", &sampling());

        assert_eq!(request["contents"][0]["role"], "user");
        assert_eq!(request["contents"][1]["role"], "model");
        assert_eq!(request["contents"][2]["parts"][0]["text"], "C");
        assert_eq!(request["systemInstruction"]["parts"][0]["text"], "be nice");
        assert!(request["generationConfig"].get("maxOutputTokens").is_none());
        let top_p = request["generationConfig"]["topP"].as_f64().unwrap();
        assert!((top_p - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_build_request_includes_max_tokens_when_set() {
        let params = SamplingParams {
            max_output_tokens: Some(2048),
            ..sampling()
        };
        let request = build_generate_request(&[Turn::user("hi")], "", &params);
        assert_eq!(request["generationConfig"]["maxOutputTokens"], 2048);
        assert!(request.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_response_joins_text_parts() {
        let value = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "Hello, " },
                        { "text": "student!" }
                    ]
                }
            }]
        });
        assert_eq!(parse_generate_response(&value).unwrap(), "Hello, student!");
    }

    #[test]
    fn test_parse_response_without_text_is_empty_error() {
        let value = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = parse_generate_response(&value).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
        assert!(err.message.contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_with_auth() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            model: "gemini-test".to_string(),
            sampling: sampling(),
            timeout: Some(Duration::from_secs(1)),
        });
        let err = client.generate(&[Turn::user("hi")], "").await.unwrap_err();
        assert!(err.is_auth());
    }
}
