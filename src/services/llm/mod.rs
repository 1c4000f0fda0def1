//! LLM abstraction layer
//!
//! The explainer talks to generative models through [`LlmClient`]. Google AI
//! (Gemini over REST) is the shipped provider.

pub mod adapters;
pub mod errors;
pub mod traits;
pub mod types;

use std::sync::Arc;

pub use adapters::GoogleAiAdapter;
pub use errors::LlmError;
pub use traits::LlmClient;
pub use types::{GenerateRequest, GenerateResponse, LlmConfig, TokenUsage};

/// Build the configured LLM client
pub fn create_client(config: LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let adapter = GoogleAiAdapter::new(config)?;
    Ok(Arc::new(adapter))
}
