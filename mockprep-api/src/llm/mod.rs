//! LLM completion client
//!
//! The service only needs one thing from a model: a text completion for a
//! system + user prompt pair. [`CompletionProvider`] is that seam; the
//! production implementation is [`openai::OpenAiClient`], tests plug in a
//! scripted stub.

pub mod openai;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiClient;

/// Transport-level failure talking to the model
///
/// A completion that arrives but cannot be used is not an `LlmError`; that is
/// judged by the payload validators in `mockprep_common::evaluation`.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("No LLM API key configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Network(String),

    #[error("LLM API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("LLM API returned no completion text")]
    EmptyResponse,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Ask the API to constrain output to a JSON object
    pub json_mode: bool,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Return the raw completion text
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String>;
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned completions in order; `Err` entries simulate transport failures
    pub struct ScriptedProvider {
        replies: Mutex<Vec<LlmResult<String>>>,
    }

    impl ScriptedProvider {
        pub fn new(mut replies: Vec<LlmResult<String>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn failing() -> Self {
            Self::new(vec![Err(LlmError::Network("connection refused".to_string()))])
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: CompletionRequest) -> LlmResult<String> {
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }
}
