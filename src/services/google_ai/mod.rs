pub mod client;
pub mod errors;
pub mod models;
pub mod retry;

pub use client::{GoogleAiClient, GoogleAiConfig, DEFAULT_BASE_URL, DEFAULT_GENERATION_MODEL};
pub use errors::{GoogleAiError, RetryError};
pub use models::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, Candidate, Content, ContentEmbedding,
    EmbedContentRequest, GenerateContentRequest, GenerateContentResponse, GeneratedText,
    GenerationConfig, Part, UsageMetadata,
};
pub use retry::{with_retry, RetryConfig, RetryHandler};
