//! Local embedding generation with fastembed.

use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};

use super::config::EmbeddingConfig;
use super::models::{EmbeddingModel, ModelInfo};
use super::{Embedder, EmbeddingError};

/// Embedder running an ONNX sentence-transformer on the CPU.
///
/// Models are downloaded on first use and cached under the configured
/// cache directory.
pub struct LocalEmbedder {
    model: TextEmbedding,
    info: ModelInfo,
}

impl LocalEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let model: EmbeddingModel = config
            .model_name()
            .parse()
            .map_err(|message| EmbeddingError::Configuration { message })?;

        tracing::info!(
            model = %model,
            repository = model.repository(),
            quantized = model.is_quantized(),
            "Loading local embedding model"
        );

        let init_options = InitOptions::new(Self::to_fastembed_model(&model))
            .with_cache_dir(config.get_cache_dir())
            .with_show_download_progress(config.show_download_progress);

        let text_embedding =
            TextEmbedding::try_new(init_options).map_err(|e| EmbeddingError::Model {
                message: format!("Failed to initialize embedding model: {e}"),
            })?;

        Ok(Self {
            model: text_embedding,
            info: ModelInfo::from(model),
        })
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }

    fn to_fastembed_model(model: &EmbeddingModel) -> FastEmbedModel {
        match model {
            EmbeddingModel::BGESmallENV15 => FastEmbedModel::BGESmallENV15,
            EmbeddingModel::BGESmallENV15Q => FastEmbedModel::BGESmallENV15Q,
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
            EmbeddingModel::AllMiniLML6V2Q => FastEmbedModel::AllMiniLML6V2Q,
            EmbeddingModel::BGEBaseENV15 => FastEmbedModel::BGEBaseENV15,
            EmbeddingModel::BGEBaseENV15Q => FastEmbedModel::BGEBaseENV15Q,
        }
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.model
            .embed(text_refs, None)
            .map_err(|e| EmbeddingError::Model {
                message: format!("Failed to generate embeddings: {e}"),
            })
    }

    fn model_name(&self) -> &str {
        &self.info.name
    }

    fn dimensions(&self) -> Option<usize> {
        self.info.dimensions
    }
}
