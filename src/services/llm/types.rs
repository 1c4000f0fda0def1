//! LLM request/response types

use serde::{Deserialize, Serialize};

use crate::services::google_ai::{DEFAULT_BASE_URL, DEFAULT_GENERATION_MODEL};

/// Request for text generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(prompt: String) -> Self {
        Self { prompt }
    }
}

/// Response from text generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerateResponse {
    /// The generated text content
    pub text: String,

    /// Token usage (if reported by provider)
    pub token_usage: Option<TokenUsage>,

    /// Model used for generation
    pub model_used: Option<String>,

    /// Reason for stopping generation
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Configuration for LLM client creation
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: usize,

    /// API key for the Google AI provider
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GENERATION_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
            max_retries: 3,
            api_key: None,
        }
    }
}
