/// LLM Client: the single point of entry for all chat-completion calls in HireFlow.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions MUST go through this module.
///
/// Speaks the OpenAI-compatible `/chat/completions` protocol (DeepSeek by
/// default). Endpoint, model, timeout and attempt count come from `Config`.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempt(s)")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling parameters for one completion.
#[derive(Debug, Clone, Copy)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Unix seconds.
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if non-empty.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.finish_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by all services in HireFlow.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_attempts: u32,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.llm_timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: config.llm_api_key.clone(),
            endpoint: completions_endpoint(&config.llm_base_url),
            model: config.llm_model.clone(),
            max_attempts: config.llm_max_attempts.max(1),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user message and returns the full response object.
    /// 429 and 5xx responses are retried with exponential backoff while
    /// attempts remain; other failures return immediately.
    pub async fn call(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let chat_response: ChatResponse = serde_json::from_str(&response.text().await?)?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: self.max_attempts,
        }))
    }
}

fn completions_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// The provider's `{"error": {"message": ...}}` text, else the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            completions_endpoint("https://api.deepseek.com/v1/"),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint("http://localhost:8000/v1"),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_response_text_and_finish_reason() {
        let body = r#"{
            "id": "cmpl-1",
            "created": 1718000000,
            "model": "deepseek-chat",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), Some("Hello"));
        assert_eq!(response.finish_reason(), Some("stop"));
        assert_eq!(response.created, 1718000000);
        assert_eq!(response.model, "deepseek-chat");
    }

    #[test]
    fn test_blank_content_is_no_text() {
        let body = r#"{"choices": [{"message": {"content": "  "}, "finish_reason": "length"}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_api_error_message_prefers_provider_message() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#.to_string();
        assert_eq!(api_error_message(body), "Invalid API key");
        assert_eq!(api_error_message("bad gateway".to_string()), "bad gateway");
    }

    #[test]
    fn test_request_serializes_fixed_fields() {
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.5,
            max_tokens: 1500,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["max_tokens"], 1500);
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
