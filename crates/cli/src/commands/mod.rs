//! Command handlers for the Aurora CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod corpus;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use corpus::CorpusCommand;
pub use search::SearchCommand;
