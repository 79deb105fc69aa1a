//! Renders retrieved passages into the grounding prompt's context block.

use crate::types::RetrievedPassage;

/// Render each passage as `[FAQ:{id}] Q: {question}\nA: {answer}`, separated
/// by a blank line, in the given order.
///
/// Callers must pass at least one passage.
pub fn format_context(passages: &[RetrievedPassage]) -> String {
    debug_assert!(!passages.is_empty(), "format_context called without passages");

    passages
        .iter()
        .map(|p| {
            format!(
                "{} Q: {}\nA: {}",
                p.record.citation(),
                p.record.question,
                p.record.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
