use serde::Serialize;

use crate::models::{CatalogItem, EmbeddableUnit};

/// One stored vector with the unit it was computed from
#[derive(Debug, Clone, Serialize)]
pub struct IndexedEntry {
    pub unit: EmbeddableUnit,
    #[serde(skip)]
    pub vector: Vec<f32>,
}

/// A named, in-memory set of vectors built by a single embedder
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub name: String,

    /// Model name of the embedder that produced every vector
    pub model_name: String,
    pub dimensions: usize,
    pub entries: Vec<IndexedEntry>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SKUs in insertion order
    pub fn skus(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.unit.metadata.sku.as_str())
            .collect()
    }
}

/// A stored unit and its cosine similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub unit: EmbeddableUnit,
    pub score: f32,
}

impl SearchResult {
    pub fn sku(&self) -> &str {
        &self.unit.metadata.sku
    }

    pub fn item(&self) -> CatalogItem {
        self.unit.to_catalog_item()
    }
}
