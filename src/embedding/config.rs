//! Configuration for embedding generation.

use std::path::PathBuf;

use super::models::{EmbeddingModel, EmbeddingProvider, DEFAULT_GOOGLE_EMBEDDING_MODEL};

/// Configuration for building an [`Embedder`](super::Embedder).
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,

    /// Provider-specific model name. `None` picks the provider default.
    pub model: Option<String>,

    /// Directory to cache downloaded local models.
    /// Defaults to `~/.partmatch/models/` if not specified.
    pub cache_dir: Option<PathBuf>,

    /// Whether to show download progress when fetching local models.
    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model: None,
            cache_dir: None,
            show_download_progress: true,
        }
    }
}

impl EmbeddingConfig {
    pub fn new(provider: EmbeddingProvider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_cache_dir(mut self, path: PathBuf) -> Self {
        self.cache_dir = Some(path);
        self
    }

    pub fn with_show_download_progress(mut self, show: bool) -> Self {
        self.show_download_progress = show;
        self
    }

    /// Model name for the configured provider, falling back to its default.
    pub fn model_name(&self) -> String {
        if let Some(model) = &self.model {
            return model.clone();
        }
        match self.provider {
            EmbeddingProvider::GoogleAi => DEFAULT_GOOGLE_EMBEDDING_MODEL.to_string(),
            EmbeddingProvider::Local => EmbeddingModel::default().to_string(),
            EmbeddingProvider::Hashing => "hashing-384".to_string(),
        }
    }

    /// Get the cache directory, using default if not specified.
    pub fn get_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".partmatch")
                .join("models")
        })
    }
}
