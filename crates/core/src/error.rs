//! Error types for the Aurora FAQ assistant.
//!
//! This module defines a unified error enum covering every failure category
//! in the workspace: configuration, I/O, LLM providers, corpus loading,
//! indexing, and prompt rendering.

use thiserror::Error;

/// Unified error type for the Aurora FAQ assistant.
///
/// Fallible functions return `Result<T, AppError>`. The answering pipeline
/// itself converts provider failures into display strings, so only startup
/// and configuration problems ever reach the user as an `AppError`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// FAQ corpus loading errors (malformed or inconsistent source)
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Index construction or lookup errors
    #[error("Index error: {0}")]
    Index(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Corpus(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
