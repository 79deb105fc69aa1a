//! FAQ knowledge base and grounded answering for the Aurora assistant.
//!
//! Loads the FAQ corpus, indexes it with TF-IDF, retrieves the passages most
//! similar to a question, and runs the grounding policy that turns them into
//! a cited answer.

pub mod corpus;
pub mod index;
pub mod intent;
pub mod rag;
pub mod stopwords;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use corpus::{default_corpus, load_corpus};
pub use index::{build_index, FaqIndex};
pub use intent::{IntentClassifier, SmalltalkClassifier};
pub use rag::{
    format_context, retrieve, AnswerOutcome, GroundedAnswer, GroundingPolicy, KnowledgeBase,
};
pub use types::{
    citation_marker, ConversationTurn, Corpus, FaqId, FaqRecord, RetrievedPassage, TurnRole,
};

use aurora_core::config::{AppConfig, RetrievalSettings};
use aurora_core::AppResult;
use aurora_llm::{create_client, CompletionClient};
use aurora_prompt::FaqPrompts;
use serde::Serialize;
use std::sync::Arc;

/// Result of answering one question: what was retrieved and what was said.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerReport {
    pub question: String,
    pub passages: Vec<RetrievedPassage>,
    #[serde(flatten)]
    pub answer: GroundedAnswer,
}

/// The full question-answering pipeline, built once per process.
#[derive(Debug, Clone)]
pub struct FaqAssistant {
    knowledge: Arc<KnowledgeBase>,
    policy: GroundingPolicy,
    settings: RetrievalSettings,
}

impl FaqAssistant {
    /// Assemble the pipeline from configuration.
    ///
    /// Fails if the configuration is invalid, the corpus cannot be loaded,
    /// a prompt override is malformed, or the provider cannot be built.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate_for_generation()?;

        let knowledge = KnowledgeBase::load(&config.corpus_path())?;
        let prompts = FaqPrompts::load(&config.prompts_dir())?;

        let api_key = config.resolve_api_key();
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
            config.timeout(),
        )?;
        let completion = CompletionClient::new(client, config.model.as_str())
            .with_timeout(config.timeout())
            .with_unavailable_message(config.messages.unavailable.as_str());

        let policy = GroundingPolicy::new(
            Arc::new(SmalltalkClassifier::new()?),
            completion,
            prompts,
            config.messages.refusal.as_str(),
        );

        tracing::info!(
            provider = %config.provider,
            model = %config.model,
            records = knowledge.corpus().len(),
            top_k = config.retrieval.top_k,
            min_score = config.retrieval.min_score,
            "FAQ assistant ready"
        );

        Ok(Self::with_parts(Arc::new(knowledge), policy, config.retrieval))
    }

    /// Assemble the pipeline from prebuilt parts.
    pub fn with_parts(
        knowledge: Arc<KnowledgeBase>,
        policy: GroundingPolicy,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            knowledge,
            policy,
            settings,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn settings(&self) -> RetrievalSettings {
        self.settings
    }

    /// Retrieve passages for `query` with the configured `top_k` and `min_score`.
    pub fn search(&self, query: &str) -> AppResult<Vec<RetrievedPassage>> {
        self.knowledge
            .retrieve(query, self.settings.top_k, self.settings.min_score)
    }

    /// Retrieve, then answer through the grounding policy.
    pub async fn answer(&self, question: &str) -> AppResult<AnswerReport> {
        let passages = self.search(question)?;
        let answer = self.policy.grounded_answer(question, &passages).await;

        Ok(AnswerReport {
            question: question.to_string(),
            passages,
            answer,
        })
    }
}
