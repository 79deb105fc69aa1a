//! Answer types produced by the grounding policy.

use crate::types::FaqId;
use serde::{Deserialize, Serialize};

/// Which branch of the grounding policy produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// No passages, conversational input: the model replied freely
    Smalltalk,

    /// No passages, not conversational: fixed refusal, no model call
    Refused,

    /// Model reply cited at least one retrieved record
    Grounded,

    /// Model reply was uncited and replaced by the top passage's answer
    CitationRepaired,
}

impl AnswerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smalltalk => "smalltalk",
            Self::Refused => "refused",
            Self::Grounded => "grounded",
            Self::CitationRepaired => "citation_repaired",
        }
    }
}

impl std::fmt::Display for AnswerOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready answer text plus how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub answer: String,

    pub outcome: AnswerOutcome,

    /// Retrieved ids whose `[FAQ:id]` marker appears in `answer`
    #[serde(default)]
    pub citations: Vec<FaqId>,
}

impl GroundedAnswer {
    pub fn new(answer: impl Into<String>, outcome: AnswerOutcome, citations: Vec<FaqId>) -> Self {
        Self {
            answer: answer.into(),
            outcome,
            citations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_snake_case() {
        let answer = GroundedAnswer::new("x [FAQ:1]", AnswerOutcome::CitationRepaired, vec![1]);
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["outcome"], "citation_repaired");
        assert_eq!(AnswerOutcome::CitationRepaired.to_string(), "citation_repaired");
    }
}
