//! LLM provider implementations.

pub mod mock;
pub mod ollama;
pub mod openai_compatible;

pub use mock::{MockBehavior, MockLlmClient};
pub use ollama::OllamaClient;
pub use openai_compatible::OpenAiCompatibleClient;

use aurora_core::{AppError, AppResult};
use std::time::Duration;

/// Build the shared reqwest client, applying the request timeout if set.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))
}
