//! Prompt system for the Aurora FAQ assistant.
//!
//! This crate provides:
//! - YAML-based prompt definitions with built-in defaults
//! - Workspace overrides under `.aurora/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, FaqPrompts};
pub use loader::{
    builtin_prompt, list_prompts, load_prompt, resolve_prompt, GROUNDED_PROMPT_ID,
    SMALLTALK_PROMPT_ID,
};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
