//! Embeddings through the Google Generative Language API.

use async_trait::async_trait;

use crate::services::google_ai::{GoogleAiClient, GoogleAiConfig};

use super::{Embedder, EmbeddingError};

const TASK_TYPE: &str = "SEMANTIC_SIMILARITY";

/// Remote embedder backed by `batchEmbedContents`.
pub struct GoogleAiEmbedder {
    client: GoogleAiClient,
    model: String,
}

impl GoogleAiEmbedder {
    pub fn new(config: GoogleAiConfig, model: impl Into<String>) -> Result<Self, EmbeddingError> {
        let client = GoogleAiClient::new(config)?;
        Ok(Self::from_client(client, model))
    }

    pub fn from_client(client: GoogleAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for GoogleAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(model = %self.model, count = texts.len(), "Requesting embeddings");

        let vectors = self
            .client
            .embed_contents(&self.model, texts, Some(TASK_TYPE))
            .await?;

        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        match self.model.as_str() {
            "text-embedding-004" | "embedding-001" => Some(768),
            _ => None,
        }
    }
}
