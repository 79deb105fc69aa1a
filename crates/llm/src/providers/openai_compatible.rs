//! OpenAI-compatible chat-completions provider.
//!
//! Serves Groq (the default), OpenAI, and any server exposing
//! `POST {base}/chat/completions` with bearer authentication.

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::providers::build_http_client;
use aurora_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for OpenAI-compatible chat-completions APIs.
pub struct OpenAiCompatibleClient {
    /// Provider name reported in logs ("groq", "openai")
    name: String,

    /// Base URL without trailing slash (e.g., "https://api.groq.com/openai/v1")
    base_url: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Create a client for `base_url` authenticated with `api_key`.
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        Ok(Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: build_http_client(timeout)?,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_wire_request<'a>(&self, request: &'a LlmRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    fn convert_response(
        &self,
        request: &LlmRequest,
        response: ChatCompletionResponse,
    ) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Llm(format!("{} response contained no message content", self.name))
            })?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model.unwrap_or_else(|| request.model.clone()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiCompatibleClient {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!(provider = %self.name, model = %request.model, "Sending chat completion");

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&self.to_wire_request(request))
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to {}: {}", self.name, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "{} API error ({}): {}",
                self.name, status, error_text
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!("Failed to parse {} response: {}", self.name, e))
        })?;

        let converted = self.convert_response(request, body)?;
        tracing::debug!(
            provider = %self.name,
            total_tokens = converted.usage.total_tokens,
            "Received chat completion"
        );

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiCompatibleClient {
        OpenAiCompatibleClient::new("groq", "https://api.groq.com/openai/v1/", "key", None)
            .unwrap()
    }

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        assert_eq!(
            client().chat_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_wire_request_shape() {
        let request = LlmRequest::new("Hello", "llama-3.1-8b-instant").with_temperature(0.0);
        let c = client();
        let json = serde_json::to_value(c.to_wire_request(&request)).unwrap();

        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_convert_response() {
        let body: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "model": "llama-3.1-8b-instant",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Yes [FAQ:1]"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
            }"#,
        )
        .unwrap();

        let request = LlmRequest::new("q", "llama-3.1-8b-instant");
        let response = client().convert_response(&request, body).unwrap();
        assert_eq!(response.content, "Yes [FAQ:1]");
        assert_eq!(response.usage.total_tokens, 16);
    }

    #[test]
    fn test_convert_response_without_choices_is_error() {
        let body: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let request = LlmRequest::new("q", "m");
        assert!(client().convert_response(&request, body).is_err());
    }
}
