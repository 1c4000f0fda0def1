//! LLM client trait definition

use super::errors::LlmError;
use super::types::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;

/// Provider-agnostic trait for LLM text generation
///
/// The explainer only depends on this trait, so tests can swap in a stub
/// and the pipeline never names a concrete provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text completion from a prompt
    ///
    /// # Returns
    /// * `Ok(GenerateResponse)` - The generated text response with metadata
    /// * `Err(LlmError)` - Provider-specific or transport errors
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Get the provider name for logging and debugging
    fn provider_name(&self) -> &'static str;

    /// Get the model identifier being used
    fn model_name(&self) -> &str;

    /// Check if the client is properly configured and can make requests
    async fn health_check(&self) -> Result<(), LlmError>;
}
