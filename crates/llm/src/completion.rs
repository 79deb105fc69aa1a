//! Failure-absorbing completion client.
//!
//! `CompletionClient::complete` never returns an error: any provider failure
//! or timeout is logged and replaced by a fixed unavailability message, so a
//! service outage degrades a turn to an apology instead of aborting it.

use crate::client::{LlmClient, LlmRequest};
use aurora_core::AppError;
use std::sync::Arc;
use std::time::Duration;

/// Sampling temperature for every grounded request.
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// Default message returned when the completion service fails.
pub const DEFAULT_UNAVAILABLE_MESSAGE: &str = "Sorry, the model service is temporarily unavailable.";

/// Single-attempt completion wrapper around an injected `LlmClient`.
#[derive(Clone)]
pub struct CompletionClient {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Option<Duration>,
    unavailable_message: String,
}

impl CompletionClient {
    /// Wrap `client`, sending every request to `model` at temperature 0.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            timeout: None,
            unavailable_message: DEFAULT_UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    /// Bound each call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the message returned on failure.
    pub fn with_unavailable_message(mut self, message: impl Into<String>) -> Self {
        self.unavailable_message = message.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// The text returned whenever generation fails.
    pub fn unavailable_message(&self) -> &str {
        &self.unavailable_message
    }

    /// Send `prompt` as a single user message and return the trimmed reply.
    ///
    /// On any failure the unavailability message is returned instead.
    pub async fn complete(&self, prompt: &str) -> String {
        let request =
            LlmRequest::new(prompt, self.model.as_str()).with_temperature(DETERMINISTIC_TEMPERATURE);

        let outcome = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.client.complete(&request))
                .await
                .unwrap_or_else(|_| {
                    Err(AppError::Llm(format!(
                        "completion timed out after {:.1}s",
                        timeout.as_secs_f64()
                    )))
                }),
            None => self.client.complete(&request).await,
        };

        match outcome {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                // Transient and permanent failures are handled alike: no retry.
                tracing::warn!(
                    provider = self.client.provider_name(),
                    model = %self.model,
                    error = %e,
                    "Completion failed; returning unavailability message"
                );
                self.unavailable_message.clone()
            }
        }
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockBehavior, MockLlmClient};

    #[tokio::test]
    async fn test_complete_trims_reply() {
        let mock = Arc::new(MockLlmClient::replying("  Full refund. [FAQ:1]\n"));
        let client = CompletionClient::new(mock.clone(), "llama-3.1-8b-instant");

        assert_eq!(client.complete("prompt").await, "Full refund. [FAQ:1]");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_becomes_unavailable_message() {
        let mock = Arc::new(MockLlmClient::failing("401 Unauthorized"));
        let client = CompletionClient::new(mock.clone(), "m");

        assert_eq!(client.complete("prompt").await, DEFAULT_UNAVAILABLE_MESSAGE);
        assert_eq!(mock.call_count(), 1, "no retries");
    }

    #[tokio::test]
    async fn test_custom_unavailable_message() {
        let client = CompletionClient::new(Arc::new(MockLlmClient::failing("boom")), "m")
            .with_unavailable_message("Try again later.");
        assert_eq!(client.complete("prompt").await, "Try again later.");
    }

    #[tokio::test]
    async fn test_timeout_becomes_unavailable_message() {
        let mock = Arc::new(MockLlmClient::new(MockBehavior::Delay(
            Duration::from_secs(5),
            "too late".to_string(),
        )));
        let client =
            CompletionClient::new(mock, "m").with_timeout(Some(Duration::from_millis(20)));

        assert_eq!(client.complete("prompt").await, DEFAULT_UNAVAILABLE_MESSAGE);
    }
}
