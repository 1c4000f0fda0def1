//! Embedding providers, supported local models and their metadata.

use std::fmt;
use std::str::FromStr;

/// Default Google AI embedding model
pub const DEFAULT_GOOGLE_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Vector width of the hashing embedder
pub const HASHING_DIMENSIONS: usize = 384;

/// Backend that turns descriptions into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingProvider {
    /// Google Generative Language `batchEmbedContents`.
    #[default]
    GoogleAi,

    /// Local ONNX model through fastembed.
    Local,

    /// Deterministic token hashing, no model and no network.
    Hashing,
}

impl EmbeddingProvider {
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::GoogleAi)
    }

    pub fn all() -> &'static [EmbeddingProvider] {
        &[Self::GoogleAi, Self::Local, Self::Hashing]
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleAi => write!(f, "google-ai"),
            Self::Local => write!(f, "local"),
            Self::Hashing => write!(f, "hashing"),
        }
    }
}

impl FromStr for EmbeddingProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google-ai" | "google" | "gemini" => Ok(Self::GoogleAi),
            "local" | "fastembed" => Ok(Self::Local),
            "hashing" | "hash" => Ok(Self::Hashing),
            _ => Err(format!(
                "Unknown embedding provider: {s}. Valid providers: google-ai, local, hashing"
            )),
        }
    }
}

/// Local models available through fastembed.
///
/// Quantized variants (Q suffix) are smaller and faster at a small quality cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingModel {
    /// BGE Small English v1.5, 384 dimensions.
    #[default]
    BGESmallENV15,
    BGESmallENV15Q,

    /// All MiniLM L6 v2, 384 dimensions, the fastest option.
    AllMiniLML6V2,
    AllMiniLML6V2Q,

    /// BGE Base English v1.5, 768 dimensions.
    BGEBaseENV15,
    BGEBaseENV15Q,
}

impl EmbeddingModel {
    pub fn dimensions(&self) -> usize {
        match self {
            Self::BGESmallENV15 | Self::BGESmallENV15Q => 384,
            Self::AllMiniLML6V2 | Self::AllMiniLML6V2Q => 384,
            Self::BGEBaseENV15 | Self::BGEBaseENV15Q => 768,
        }
    }

    pub fn is_quantized(&self) -> bool {
        matches!(
            self,
            Self::BGESmallENV15Q | Self::AllMiniLML6V2Q | Self::BGEBaseENV15Q
        )
    }

    /// Hugging Face repository the weights come from.
    pub fn repository(&self) -> &'static str {
        match self {
            Self::BGESmallENV15 | Self::BGESmallENV15Q => "BAAI/bge-small-en-v1.5",
            Self::AllMiniLML6V2 | Self::AllMiniLML6V2Q => {
                "sentence-transformers/all-MiniLM-L6-v2"
            }
            Self::BGEBaseENV15 | Self::BGEBaseENV15Q => "BAAI/bge-base-en-v1.5",
        }
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BGESmallENV15 => "bge-small-en-v1.5",
            Self::BGESmallENV15Q => "bge-small-en-v1.5-q",
            Self::AllMiniLML6V2 => "all-minilm-l6-v2",
            Self::AllMiniLML6V2Q => "all-minilm-l6-v2-q",
            Self::BGEBaseENV15 => "bge-base-en-v1.5",
            Self::BGEBaseENV15Q => "bge-base-en-v1.5-q",
        };
        write!(f, "{name}")
    }
}

impl FromStr for EmbeddingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bgesmallenv15" | "bge-small-en-v1.5" => Ok(Self::BGESmallENV15),
            "bgesmallenv15q" | "bge-small-en-v1.5-q" => Ok(Self::BGESmallENV15Q),
            "allminilml6v2" | "all-minilm-l6-v2" => Ok(Self::AllMiniLML6V2),
            "allminilml6v2q" | "all-minilm-l6-v2-q" => Ok(Self::AllMiniLML6V2Q),
            "bgebaseenv15" | "bge-base-en-v1.5" => Ok(Self::BGEBaseENV15),
            "bgebaseenv15q" | "bge-base-en-v1.5-q" => Ok(Self::BGEBaseENV15Q),
            _ => Err(format!("Unknown embedding model: {s}")),
        }
    }
}

/// Identity of the model behind an embedder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub provider: EmbeddingProvider,
    pub name: String,

    /// Vector width, when known before the first call.
    pub dimensions: Option<usize>,
}

impl From<EmbeddingModel> for ModelInfo {
    fn from(model: EmbeddingModel) -> Self {
        Self {
            provider: EmbeddingProvider::Local,
            name: model.to_string(),
            dimensions: Some(model.dimensions()),
        }
    }
}
