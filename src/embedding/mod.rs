//! Text embedding for similarity search.
//!
//! Every backend implements [`Embedder`]. The vector store records the
//! embedder's model name on each collection so queries are always embedded
//! with the model that built the index.

mod config;
mod google_ai;
mod hashing;
mod models;
#[cfg(feature = "fastembed")]
mod service;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::google_ai::{GoogleAiConfig, GoogleAiError};

pub use config::EmbeddingConfig;
pub use google_ai::GoogleAiEmbedder;
pub use hashing::HashingEmbedder;
pub use models::{
    EmbeddingModel, EmbeddingProvider, ModelInfo, DEFAULT_GOOGLE_EMBEDDING_MODEL,
    HASHING_DIMENSIONS,
};
#[cfg(feature = "fastembed")]
pub use service::LocalEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding configuration error: {message}")]
    Configuration { message: String },

    #[error("Embedding model error: {message}")]
    Model { message: String },

    #[error("Embedding provider error: {0}")]
    Provider(#[from] GoogleAiError),

    #[error("Expected {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} vectors, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedder returned no vector")]
    EmptyResult,
}

/// Turns text into fixed-length vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed every text, one vector per input in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::EmptyResult)
    }

    /// Identifier recorded on collections built with this embedder.
    fn model_name(&self) -> &str;

    /// Vector width, if known without calling the model.
    fn dimensions(&self) -> Option<usize>;
}

/// Build the embedder selected by `config`.
///
/// `google` carries credentials for the Google AI provider and is ignored by
/// the others.
pub fn create_embedder(
    config: &EmbeddingConfig,
    google: Option<GoogleAiConfig>,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    tracing::debug!(provider = %config.provider, model = %config.model_name(), "Creating embedder");

    match config.provider {
        EmbeddingProvider::GoogleAi => {
            let google = google.ok_or_else(|| EmbeddingError::Configuration {
                message: "GOOGLE_AI_API_KEY is required for the google-ai embedding provider"
                    .to_string(),
            })?;
            Ok(Arc::new(GoogleAiEmbedder::new(google, config.model_name())?))
        }
        EmbeddingProvider::Hashing => {
            let dimensions = match &config.model {
                Some(model) => parse_hashing_dimensions(model)?,
                None => HASHING_DIMENSIONS,
            };
            Ok(Arc::new(HashingEmbedder::new(dimensions)))
        }
        #[cfg(feature = "fastembed")]
        EmbeddingProvider::Local => Ok(Arc::new(LocalEmbedder::new(config)?)),
        #[cfg(not(feature = "fastembed"))]
        EmbeddingProvider::Local => Err(EmbeddingError::Configuration {
            message: "the local embedding provider requires the `fastembed` feature".to_string(),
        }),
    }
}

/// Accepts `hashing-<N>` or a bare `<N>`.
fn parse_hashing_dimensions(model: &str) -> Result<usize, EmbeddingError> {
    let raw = model.strip_prefix("hashing-").unwrap_or(model);
    match raw.parse::<usize>() {
        Ok(dimensions) if dimensions > 0 => Ok(dimensions),
        _ => Err(EmbeddingError::Configuration {
            message: format!("Invalid hashing model '{model}', expected hashing-<dimensions>"),
        }),
    }
}
