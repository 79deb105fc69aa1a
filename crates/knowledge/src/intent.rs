//! Smalltalk detection for queries that retrieve nothing.

use aurora_core::{AppError, AppResult};
use regex::Regex;

/// Greetings, pleasantries and farewells recognized at the start of a message.
/// Entries are regex fragments; `\s*` lets "goodmorning" and "good morning" both match.
pub const SMALLTALK_PHRASES: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "yo",
    "hola",
    "sup",
    r"good\s*(?:morning|evening|afternoon)",
    r"how\s*are\s*you",
    "thanks",
    r"thank\s*you",
    "bye",
    "goodbye",
];

/// Decides whether a message is conversational rather than a policy question.
pub trait IntentClassifier: Send + Sync {
    fn is_smalltalk(&self, text: &str) -> bool;
}

/// Phrase-list classifier: case-insensitive, anchored at the start of the
/// trimmed text, whole word.
#[derive(Debug, Clone)]
pub struct SmalltalkClassifier {
    pattern: Regex,
}

impl SmalltalkClassifier {
    pub fn new() -> AppResult<Self> {
        Self::with_phrases(SMALLTALK_PHRASES)
    }

    pub fn with_phrases(phrases: &[&str]) -> AppResult<Self> {
        if phrases.is_empty() {
            return Err(AppError::Config(
                "Smalltalk phrase list must not be empty".to_string(),
            ));
        }

        let pattern = Regex::new(&format!(r"(?i)^(?:{})\b", phrases.join("|")))
            .map_err(|e| AppError::Config(format!("Invalid smalltalk phrase: {}", e)))?;
        Ok(Self { pattern })
    }
}

impl IntentClassifier for SmalltalkClassifier {
    fn is_smalltalk(&self, text: &str) -> bool {
        self.pattern.is_match(text.trim())
    }
}
