//! Grounding policy: decides whether to refuse, chat, or answer from the FAQ,
//! and repairs answers that fail to cite a retrieved record.

use crate::intent::IntentClassifier;
use crate::rag::context::format_context;
use crate::rag::types::{AnswerOutcome, GroundedAnswer};
use crate::types::{citation_marker, RetrievedPassage};
use aurora_core::AppResult;
use aurora_llm::CompletionClient;
use aurora_prompt::{BuiltPrompt, FaqPrompts};
use std::sync::Arc;

/// Turns a question and its retrieved passages into a display-ready answer.
#[derive(Clone)]
pub struct GroundingPolicy {
    classifier: Arc<dyn IntentClassifier>,
    completion: CompletionClient,
    prompts: FaqPrompts,
    refusal_message: String,
}

impl GroundingPolicy {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        completion: CompletionClient,
        prompts: FaqPrompts,
        refusal_message: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            completion,
            prompts,
            refusal_message: refusal_message.into(),
        }
    }

    pub fn refusal_message(&self) -> &str {
        &self.refusal_message
    }

    pub fn completion(&self) -> &CompletionClient {
        &self.completion
    }

    /// Produce the answer for `question`. Never fails.
    ///
    /// Without passages, smalltalk goes to the model and anything else gets
    /// the refusal. With passages, the model answers from the formatted
    /// context; if its reply cites none of the retrieved ids, the best
    /// passage's answer and marker are returned instead.
    pub async fn grounded_answer(
        &self,
        question: &str,
        passages: &[RetrievedPassage],
    ) -> GroundedAnswer {
        if passages.is_empty() {
            return self.answer_without_passages(question).await;
        }

        let context = format_context(passages);
        let reply = self
            .generate(self.prompts.render_grounded(question, &context))
            .await;

        let citations = cited_ids(&reply, passages);
        if !citations.is_empty() {
            tracing::info!(outcome = %AnswerOutcome::Grounded, citations = ?citations, "Answer grounded");
            return GroundedAnswer::new(reply, AnswerOutcome::Grounded, citations);
        }

        let best = best_passage(passages);
        tracing::info!(
            outcome = %AnswerOutcome::CitationRepaired,
            faq_id = best.record.id,
            "Reply cited no retrieved record; using the top FAQ answer"
        );
        GroundedAnswer::new(
            format!("{} {}", best.record.answer, best.record.citation()),
            AnswerOutcome::CitationRepaired,
            vec![best.record.id],
        )
    }

    async fn answer_without_passages(&self, question: &str) -> GroundedAnswer {
        if self.classifier.is_smalltalk(question) {
            let reply = self.generate(self.prompts.render_smalltalk(question)).await;
            tracing::info!(outcome = %AnswerOutcome::Smalltalk, "No passages; replying to smalltalk");
            return GroundedAnswer::new(reply, AnswerOutcome::Smalltalk, Vec::new());
        }

        tracing::info!(outcome = %AnswerOutcome::Refused, "No passages; refusing");
        GroundedAnswer::new(self.refusal_message.clone(), AnswerOutcome::Refused, Vec::new())
    }

    /// Complete a rendered prompt; a render failure counts as a generation failure.
    async fn generate(&self, prompt: AppResult<BuiltPrompt>) -> String {
        match prompt {
            Ok(prompt) => self.completion.complete(&prompt.text).await,
            Err(e) => {
                tracing::warn!(error = %e, "Prompt rendering failed; returning unavailability message");
                self.completion.unavailable_message().to_string()
            }
        }
    }
}

impl std::fmt::Debug for GroundingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroundingPolicy")
            .field("completion", &self.completion)
            .field("refusal_message", &self.refusal_message)
            .finish()
    }
}

/// Retrieved ids whose marker appears in `reply`, in retrieval order.
fn cited_ids(reply: &str, passages: &[RetrievedPassage]) -> Vec<i64> {
    let mut ids: Vec<i64> = Vec::new();
    for passage in passages {
        let id = passage.record.id;
        if !ids.contains(&id) && reply.contains(&citation_marker(id)) {
            ids.push(id);
        }
    }
    ids
}

/// Highest-scoring passage; the first one wins among equal scores.
fn best_passage(passages: &[RetrievedPassage]) -> &RetrievedPassage {
    let mut best = &passages[0];
    for passage in &passages[1..] {
        if passage.score > best.score {
            best = passage;
        }
    }
    best
}
