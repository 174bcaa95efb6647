//! OpenAI-compatible chat completions client
//!
//! `POST {base_url}/chat/completions` with a bearer key. Works with any
//! server speaking the same protocol (local gateways, proxies).
//! Outbound calls are throttled with a token bucket sized from
//! `[llm] requests_per_minute`.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use mockprep_common::config::LlmConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

use super::{CompletionProvider, CompletionRequest, LlmError, LlmResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type DirectLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    rate_limiter: DirectLimiter,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": request.temperature,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

/// First choice's message content, if any
fn completion_text(response: ChatResponse) -> LlmResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        self.rate_limiter.until_ready().await;

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.build_request_body(&request))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Network(format!("Unreadable completion response: {}", e)))?;

        completion_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:8080/v1/".to_string(),
            ..LlmConfig::default()
        }
    }

    fn request(json_mode: bool) -> CompletionRequest {
        CompletionRequest {
            system: "You are an interviewer".to_string(),
            user: "Ask a question".to_string(),
            temperature: 0.7,
            json_mode,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAiClient::new(&config()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let client = OpenAiClient::new(&config()).unwrap();
        let body = client.build_request_body(&request(true));
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Ask a question");
        assert_eq!(body["response_format"]["type"], "json_object");

        let plain = client.build_request_body(&request(false));
        assert!(plain.get("response_format").is_none());
    }

    #[test]
    fn test_completion_text_takes_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "{\"ok\": true}" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(completion_text(response).unwrap(), "{\"ok\": true}");
    }

    #[test]
    fn test_completion_text_empty() {
        let no_choices: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(completion_text(no_choices), Err(LlmError::EmptyResponse)));

        let null_content: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": null } }] }))
                .unwrap();
        assert!(matches!(completion_text(null_content), Err(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = OpenAiClient::new(&LlmConfig::default()).unwrap();
        let result = client.complete(request(true)).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }
}
