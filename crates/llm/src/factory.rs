//! LLM provider factory.
//!
//! Resolves a provider name from configuration into a concrete client,
//! injecting the endpoint, API key, and request timeout.

use crate::client::LlmClient;
use crate::providers::{MockLlmClient, OllamaClient, OpenAiCompatibleClient};
use crate::types::ProviderType;
use aurora_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Reply used by the `mock` provider for offline runs.
pub const MOCK_REPLY: &str = "This is an offline mock reply.";

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "openai", "ollama", "mock")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - API key, required by "groq" and "openai"
/// * `timeout` - Optional per-request timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required key is
/// missing, and `AppError::Llm` if the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    let base_url = endpoint.or(provider_type.default_base_url());

    match provider_type {
        ProviderType::Groq | ProviderType::OpenAI => {
            let api_key = api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                AppError::Config(format!(
                    "{} provider requires API key",
                    provider_type.as_str()
                ))
            })?;
            let base_url = base_url.unwrap_or_default();
            let client =
                OpenAiCompatibleClient::new(provider_type.as_str(), base_url, api_key, timeout)?;
            tracing::debug!(provider = provider_type.as_str(), %base_url, "Created LLM client");
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = base_url.unwrap_or_default();
            let client = OllamaClient::with_base_url(base_url, timeout)?;
            tracing::debug!(provider = "ollama", %base_url, "Created LLM client");
            Ok(Arc::new(client))
        }
        ProviderType::Mock => Ok(Arc::new(MockLlmClient::replying(MOCK_REPLY))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_groq_with_key() {
        let client = create_client("groq", None, Some("gsk_test"), None).unwrap();
        assert_eq!(client.provider_name(), "groq");
    }

    #[test]
    fn test_groq_requires_api_key() {
        match create_client("groq", None, None, None) {
            Err(err) => assert!(err.to_string().contains("groq provider requires API key")),
            Ok(_) => panic!("Expected error for Groq without API key"),
        }
    }

    #[test]
    fn test_openai_with_custom_endpoint() {
        let client =
            create_client("openai", Some("http://localhost:8080/v1"), Some("k"), None).unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
