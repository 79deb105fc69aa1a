//! Provider identification.

/// Default Groq endpoint (OpenAI-compatible).
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default OpenAI endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default local Ollama endpoint.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Groq,
    OpenAI,
    Ollama,
    Mock,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" | "openai-compatible" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    /// Base URL used when no endpoint is configured.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::Groq => Some(GROQ_BASE_URL),
            Self::OpenAI => Some(OPENAI_BASE_URL),
            Self::Ollama => Some(OLLAMA_BASE_URL),
            Self::Mock => None,
        }
    }

    /// Whether requests must carry a bearer API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Groq | Self::OpenAI)
    }
}
