//! Deterministic token-hashing embedder.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::models::HASHING_DIMENSIONS;
use super::{Embedder, EmbeddingError};

/// Bag-of-tokens embedder that needs neither a model nor the network.
///
/// Each lowercase token is hashed with SHA-256 into one of `dimensions`
/// buckets and counted. Texts that share tokens share buckets, so cosine
/// similarity tracks token overlap. Output is identical across runs and
/// platforms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    model_name: String,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(HASHING_DIMENSIONS)
    }
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            model_name: format!("hashing-{}", dimensions.max(1)),
        }
    }

    /// Split into lowercase tokens. Dots stay inside tokens so values like
    /// `0.080` survive, but are trimmed from the ends.
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '.'))
            .map(|token| token.trim_matches('.'))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % self.dimensions as u64) as usize
    }

    /// Embed a single text synchronously.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in Self::tokenize(text) {
            vector[self.bucket(&token)] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}
