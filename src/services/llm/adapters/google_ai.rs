//! Gemini `generateContent` behind [`LlmClient`]

use async_trait::async_trait;
use std::time::Duration;

use crate::env::apis as env_apis;
use crate::services::google_ai::{GeneratedText, GoogleAiClient, GoogleAiConfig, GoogleAiError};

use super::super::errors::LlmError;
use super::super::traits::LlmClient;
use super::super::types::{GenerateRequest, GenerateResponse, LlmConfig, TokenUsage};

pub struct GoogleAiAdapter {
    client: GoogleAiClient,
}

impl GoogleAiAdapter {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let Some(api_key) = config.api_key.filter(|key| !key.trim().is_empty()) else {
            return Err(LlmError::ConfigurationError {
                message: format!("{} is required for explanations", env_apis::GOOGLE_AI_API_KEY),
            });
        };

        let client = GoogleAiClient::new(GoogleAiConfig {
            api_key,
            base_url: config.base_url,
            model: config.model,
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
        })?;

        Ok(Self::from_client(client))
    }

    pub fn from_client(client: GoogleAiClient) -> Self {
        Self { client }
    }
}

impl From<GeneratedText> for GenerateResponse {
    fn from(generated: GeneratedText) -> Self {
        Self {
            text: generated.text,
            token_usage: generated.usage.map(|usage| TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            }),
            model_used: generated.model_used,
            finish_reason: generated.finish_reason,
        }
    }
}

#[async_trait]
impl LlmClient for GoogleAiAdapter {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let generated = self.client.generate_text(request.prompt).await?;
        Ok(generated.into())
    }

    fn provider_name(&self) -> &'static str {
        "google-ai"
    }

    fn model_name(&self) -> &str {
        &self.client.config().model
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        self.client.test_connection().await?;
        Ok(())
    }
}

/// Retry hints stay behind: by the time an error reaches the explainer the
/// client has already spent its retries.
impl From<GoogleAiError> for LlmError {
    fn from(err: GoogleAiError) -> Self {
        match err {
            GoogleAiError::AuthenticationFailed { message } => {
                LlmError::AuthenticationFailed { message }
            }
            GoogleAiError::QuotaExceeded { message } => LlmError::QuotaExceeded { message },
            GoogleAiError::RateLimitExceeded { message, .. } => {
                LlmError::RateLimitExceeded { message }
            }
            GoogleAiError::Timeout { timeout_ms } => LlmError::Timeout {
                timeout_secs: timeout_ms / 1000,
            },
            GoogleAiError::NetworkError { source } => LlmError::NetworkError {
                message: source.to_string(),
            },
            GoogleAiError::ServerError { status, message, .. } => LlmError::ServerError {
                message: format!("HTTP {status}: {message}"),
            },
            GoogleAiError::ServiceUnavailable { message, .. } => {
                LlmError::ProviderUnavailable { message }
            }
            GoogleAiError::ContentBlocked => LlmError::ContentBlocked,
            GoogleAiError::InvalidRequest { message } => LlmError::InvalidRequest { message },
            GoogleAiError::ParseError { message } => LlmError::ParseError { message },
            GoogleAiError::InvalidResponse { message } => LlmError::InvalidResponse { message },
            GoogleAiError::ConfigurationError { message } => {
                LlmError::ConfigurationError { message }
            }
        }
    }
}
