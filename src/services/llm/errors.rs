//! LLM error types
//!
//! Provider-agnostic errors that wrap provider-specific failures.

use thiserror::Error;

/// Provider-agnostic LLM errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    #[error("Request timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Content blocked by safety filters")]
    ContentBlocked,

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Provider unavailable: {message}")]
    ProviderUnavailable { message: String },
}

impl LlmError {
    /// Short reason suitable for a report placeholder
    pub fn user_message(&self) -> String {
        match self {
            LlmError::ConfigurationError { message } => {
                format!("configuration error: {message}")
            }
            LlmError::AuthenticationFailed { .. } => {
                "authentication failed, check the API key".to_string()
            }
            LlmError::RateLimitExceeded { .. } => "rate limit exceeded".to_string(),
            LlmError::Timeout { timeout_secs } => {
                format!("request timed out after {timeout_secs}s")
            }
            LlmError::NetworkError { .. } => "network connection error".to_string(),
            LlmError::ContentBlocked => "content blocked by safety filters".to_string(),
            LlmError::QuotaExceeded { .. } => "API quota exceeded".to_string(),
            LlmError::ServerError { .. } => "provider server error".to_string(),
            LlmError::ProviderUnavailable { message } => {
                format!("provider unavailable: {message}")
            }
            LlmError::ParseError { .. } | LlmError::InvalidResponse { .. } => {
                "invalid response from provider".to_string()
            }
            LlmError::InvalidRequest { message } => format!("invalid request: {message}"),
        }
    }
}
