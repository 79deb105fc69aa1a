//! Scripted LLM provider for tests and offline runs.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use aurora_core::{AppError, AppResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does when asked for a completion.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this text verbatim
    Reply(String),

    /// Fail with an `AppError::Llm` carrying this message
    Fail(String),

    /// Sleep before replying (exercises caller timeouts)
    Delay(Duration, String),
}

/// Deterministic `LlmClient` that records every prompt it receives.
#[derive(Debug)]
pub struct MockLlmClient {
    behavior: MockBehavior,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    /// Mock that always fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(message.into()))
    }

    /// Number of completion calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: &LlmRequest) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.last_user_content().unwrap_or_default().to_string());
        }
    }

    fn respond(&self, request: &LlmRequest, text: &str) -> LlmResponse {
        LlmResponse {
            content: text.to_string(),
            model: request.model.clone(),
            usage: LlmUsage::default(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.record(request);

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(self.respond(request, text)),
            MockBehavior::Fail(message) => Err(AppError::Llm(message.clone())),
            MockBehavior::Delay(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(self.respond(request, text))
            }
        }
    }
}
