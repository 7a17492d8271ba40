//! LLM provider implementations.

use std::future::Future;

pub mod gemini;
pub mod shared;

pub use gemini::{GeminiClient, GeminiConfig};
pub use shared::{
    ProviderError, ProviderErrorKind, ProviderResult, Turn, resolve_api_key, resolve_base_url,
};

/// A text generation backend.
///
/// Implementations receive the full conversation (oldest first, ending with a
/// user turn) plus a system instruction and return the reply text.
pub trait Generate: Send + Sync {
    fn generate(
        &self,
        turns: &[Turn],
        system_instruction: &str,
    ) -> impl Future<Output = ProviderResult<String>> + Send;
}
