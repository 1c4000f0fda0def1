use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::services::llm::LlmError;

/// Custom error types for the matching pipeline
#[derive(Error, Debug)]
pub enum PartMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Indexing error: {message}")]
    Indexing { message: String },

    #[error("No match available: {message}")]
    MatchNotFound { message: String },

    #[error("Explanation error: {message}")]
    Explanation { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl PartMatchError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an indexing error
    pub fn indexing<S: Into<String>>(message: S) -> Self {
        Self::Indexing {
            message: message.into(),
        }
    }

    /// Create a match-not-found error
    pub fn match_not_found<S: Into<String>>(message: S) -> Self {
        Self::MatchNotFound {
            message: message.into(),
        }
    }

    /// Create an explanation error
    pub fn explanation<S: Into<String>>(message: S) -> Self {
        Self::Explanation {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            PartMatchError::Io(_) => "io",
            PartMatchError::Json(_) => "json",
            PartMatchError::Toml(_) => "toml",
            PartMatchError::InvalidConfig { .. } => "config",
            PartMatchError::Indexing { .. } => "indexing",
            PartMatchError::MatchNotFound { .. } => "match_not_found",
            PartMatchError::Explanation { .. } => "explanation",
            PartMatchError::Validation { .. } => "validation",
            PartMatchError::Embedding(_) => "embedding",
            PartMatchError::Llm(_) => "llm",
        }
    }
}

/// Result type alias for partmatch
pub type Result<T> = std::result::Result<T, PartMatchError>;
