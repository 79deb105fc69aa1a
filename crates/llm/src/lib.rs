//! LLM integration crate for the Aurora FAQ assistant.
//!
//! Provides a provider-agnostic `LlmClient` trait, concrete providers, and
//! the `CompletionClient` wrapper the answering pipeline talks to.
//!
//! # Providers
//! - **Groq** (default) and any other OpenAI-compatible endpoint
//! - **Ollama**: local LLM runtime
//! - **Mock**: scripted replies for tests and offline runs
//!
//! # Example
//! ```no_run
//! use aurora_llm::{create_client, CompletionClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client("groq", None, Some("gsk_..."), None)?;
//! let completion = CompletionClient::new(client, "llama-3.1-8b-instant");
//! println!("{}", completion.complete("Hello!").await);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod completion;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, ChatRole, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use completion::{CompletionClient, DEFAULT_UNAVAILABLE_MESSAGE};
pub use factory::create_client;
pub use providers::{MockBehavior, MockLlmClient, OllamaClient, OpenAiCompatibleClient};
pub use types::ProviderType;
