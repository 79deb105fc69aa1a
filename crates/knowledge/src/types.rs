//! FAQ knowledge type definitions.

use aurora_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable identifier of an FAQ record; appears in `[FAQ:{id}]` citations.
pub type FaqId = i64;

/// One question/answer pair of the FAQ corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqRecord {
    /// Unique, stable identifier
    pub id: FaqId,

    /// Customer-facing question
    #[serde(default)]
    pub question: String,

    /// Authoritative answer text
    #[serde(default)]
    pub answer: String,

    /// Optional label naming the policy the answer comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FaqRecord {
    pub fn new(
        id: FaqId,
        question: impl Into<String>,
        answer: impl Into<String>,
        source: Option<&str>,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            source: source.map(str::to_string),
        }
    }

    /// Text indexed for retrieval: question and answer joined by a space.
    pub fn document_text(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }

    /// Citation marker for this record, e.g. `[FAQ:3]`.
    pub fn citation(&self) -> String {
        citation_marker(self.id)
    }
}

/// Render the citation marker for `id`.
pub fn citation_marker(id: FaqId) -> String {
    format!("[FAQ:{}]", id)
}

/// Ordered, read-only FAQ corpus with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Corpus {
    records: Vec<FaqRecord>,
}

impl Corpus {
    /// Build a corpus, rejecting duplicate ids.
    pub fn new(records: Vec<FaqRecord>) -> AppResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(AppError::Corpus(format!(
                    "Duplicate FAQ id {} in corpus",
                    record.id
                )));
            }
        }

        Ok(Self { records })
    }

    /// Build a corpus from records whose ids are already known to be unique.
    pub(crate) fn from_unique(records: Vec<FaqRecord>) -> Self {
        debug_assert!(Self::new(records.clone()).is_ok());
        Self { records }
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FaqRecord> {
        self.records.get(position)
    }

    pub fn find(&self, id: FaqId) -> Option<&FaqRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Record ids in corpus order.
    pub fn ids(&self) -> impl Iterator<Item = FaqId> + '_ {
        self.records.iter().map(|r| r.id)
    }
}

/// An FAQ record retrieved for a query, with its cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedPassage {
    #[serde(flatten)]
    pub record: FaqRecord,

    /// Cosine similarity in [0, 1]
    pub score: f32,
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message of a conversation, owned by the conversational surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}
