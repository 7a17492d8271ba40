//! AI responder: builds the conversation for the generation API and always
//! produces a reply string.

use crate::model::{Message, Role, StudyMode};
use crate::prompts;
use crate::providers::{Generate, ProviderError, Turn};

/// Reply used when the API rejects or lacks the key.
pub const API_KEY_FALLBACK: &str = "Oops! It seems there is an issue with the API Key configuration. Please check your environment variables.";

/// Reply used for every other failure.
pub const CONNECTION_FALLBACK: &str =
    "I ran into a temporary connection issue. Please try sending your message again!";

/// Maps a provider failure to the fixed apology shown to the student.
pub fn fallback_reply(err: &ProviderError) -> &'static str {
    if err.is_auth() {
        API_KEY_FALLBACK
    } else {
        CONNECTION_FALLBACK
    }
}

/// Builds the outbound conversation.
///
/// Every history message becomes one role-tagged turn in order. The final
/// user turn carries the mode tag. When the history already ends with a user
/// turn equal to the prompt, ignoring surrounding whitespace, that entry is
/// replaced instead of duplicated.
pub fn build_turns(prompt: &str, history: &[Message], mode: StudyMode) -> Vec<Turn> {
    let mut turns: Vec<Turn> = history
        .iter()
        .map(|m| Turn {
            role: m.role,
            text: m.content.clone(),
        })
        .collect();

    let request = prompts::user_request(prompt, mode);
    match turns.last_mut() {
        Some(last) if last.role == Role::User && last.text.trim() == prompt.trim() => {
            last.text = request;
        }
        _ => turns.push(Turn::user(request)),
    }
    turns
}

/// Produces tutor replies on top of a [`Generate`] backend.
#[derive(Debug, Clone)]
pub struct Responder<G> {
    backend: G,
}

impl<G: Generate> Responder<G> {
    pub fn new(backend: G) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &G {
        &self.backend
    }

    /// Returns the reply for `prompt`. Never fails: provider errors are
    /// logged and turned into a fixed apology.
    pub async fn respond(&self, prompt: &str, history: &[Message], mode: StudyMode) -> String {
        let turns = build_turns(prompt, history, mode);
        let system = prompts::system_instruction(mode);

        match self.backend.generate(&turns, &system).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(kind = %err.kind, error = %err.message, "Generation failed");
                fallback_reply(&err).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::providers::{ProviderErrorKind, ProviderResult};

    /// Records the request and answers with a canned result.
    struct FakeBackend {
        result: ProviderResult<String>,
        seen: Mutex<Vec<(Vec<Turn>, String)>>,
    }

    impl FakeBackend {
        fn new(result: ProviderResult<String>) -> Self {
            Self {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Generate for FakeBackend {
        async fn generate(
            &self,
            turns: &[Turn],
            system_instruction: &str,
        ) -> ProviderResult<String> {
            self.seen
                .lock()
                .unwrap()
                .push((turns.to_vec(), system_instruction.to_string()));
            self.result.clone()
        }
    }

    #[test]
    fn test_history_then_mode_tagged_prompt() {
        let history = vec![Message::user("A"), Message::model("B")];
        let turns = build_turns("C", &history, StudyMode::Study);

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0], Turn::user("A"));
        assert_eq!(turns[1], Turn::model("B"));
        assert_eq!(turns[2].role, Role::User);
        assert!(turns[2].text.contains('C'));
        assert_eq!(turns[2].text, "Current Mode: Study. User Request: C");
    }

    #[test]
    fn test_prompt_already_in_history_is_not_duplicated() {
        let history = vec![Message::user("hello")];
        let turns = build_turns("hello", &history, StudyMode::General);

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text, "Current Mode: General. User Request: hello");
    }

    #[test]
    fn test_prompt_matching_history_after_trim_is_not_duplicated() {
        let history = vec![Message::model("Hi!"), Message::user("What is DNA? ")];
        let turns = build_turns("What is DNA?", &history, StudyMode::Study);

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(turns[1].text, "Current Mode: Study. User Request: What is DNA?");
    }

    #[tokio::test]
    async fn test_respond_returns_backend_text() {
        let responder = Responder::new(FakeBackend::new(Ok("Photosynthesis is...".into())));

        let reply = responder
            .respond("What is photosynthesis?", &[], StudyMode::Notes)
            .await;

        assert_eq!(reply, "Photosynthesis is...");
        let seen = responder.backend().seen.lock().unwrap();
        assert!(seen[0].1.contains("[Mode: Notes]"));
    }

    #[tokio::test]
    async fn test_respond_never_fails_on_connection_errors() {
        let responder = Responder::new(FakeBackend::new(Err(ProviderError::timeout("boom"))));

        let reply = responder.respond("hi", &[], StudyMode::General).await;

        assert_eq!(reply, CONNECTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_respond_reports_api_key_problems() {
        let err = ProviderError::new(ProviderErrorKind::Auth, "API key not valid");
        let responder = Responder::new(FakeBackend::new(Err(err)));

        let reply = responder.respond("hi", &[], StudyMode::General).await;

        assert_eq!(reply, API_KEY_FALLBACK);
    }
}
