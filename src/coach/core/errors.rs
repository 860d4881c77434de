//! Error types for the coaching subsystem.

use thiserror::Error;

use crate::llm::LlmError;

/// Coaching subsystem error type.
///
/// Only construction and configuration paths return these; a chat turn never does.
#[derive(Debug, Error)]
pub enum CoachError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A sanitizer term could not be compiled into a pattern.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    /// The remote generation client could not be built.
    #[error("llm client error: {0}")]
    Llm(#[from] LlmError),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for coaching operations.
pub type CoachResult<T> = Result<T, CoachError>;
