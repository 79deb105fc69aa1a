//! Retrieval-augmented answering: retrieval, context formatting and the
//! grounding policy that keeps answers tied to cited FAQ records.

pub mod answer;
pub mod context;
pub mod search;
pub mod types;

pub use answer::GroundingPolicy;
pub use context::format_context;
pub use search::{retrieve, KnowledgeBase};
pub use types::{AnswerOutcome, GroundedAnswer};
