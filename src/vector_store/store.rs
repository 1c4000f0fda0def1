use std::collections::HashMap;
use std::sync::Arc;

use crate::embedding::{Embedder, EmbeddingError};
use crate::error::{PartMatchError, Result};
use crate::models::EmbeddableUnit;

#[cfg(feature = "semantic-search")]
use super::lance::LanceIndex;
use super::models::{Collection, IndexedEntry, SearchResult};
#[cfg(not(feature = "semantic-search"))]
use super::similarity::top_k;

struct StoredCollection {
    collection: Collection,
    embedder: Arc<dyn Embedder>,
    #[cfg(feature = "semantic-search")]
    index: LanceIndex,
}

impl StoredCollection {
    #[cfg(feature = "semantic-search")]
    async fn rank(&self, vector: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        self.index.nearest(vector, k).await
    }

    #[cfg(not(feature = "semantic-search"))]
    async fn rank(&self, vector: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        let entries = &self.collection.entries;
        Ok(top_k(
            vector,
            entries.iter().map(|entry| entry.vector.as_slice()),
            k,
        ))
    }
}

/// Named collections with nearest-neighbour search.
///
/// Each collection keeps the embedder that built it, and every text query is
/// embedded with that same embedder.
#[derive(Default)]
pub struct VectorStore {
    collections: HashMap<String, StoredCollection>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `units` in a single batch and store them under `name`.
    ///
    /// An existing collection with the same name is replaced. Returns the
    /// number of stored vectors.
    pub async fn create_collection(
        &mut self,
        name: &str,
        units: Vec<EmbeddableUnit>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<usize> {
        if name.trim().is_empty() {
            return Err(PartMatchError::validation(
                "collection",
                "collection name must not be empty",
            ));
        }
        if units.is_empty() {
            return Err(PartMatchError::indexing(format!(
                "cannot build collection '{name}' from an empty catalog"
            )));
        }

        let texts: Vec<String> = units.iter().map(|unit| unit.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await.map_err(|e| {
            PartMatchError::indexing(format!("embedding failed for collection '{name}': {e}"))
        })?;

        if vectors.len() != units.len() {
            return Err(PartMatchError::indexing(
                EmbeddingError::CountMismatch {
                    expected: units.len(),
                    actual: vectors.len(),
                }
                .to_string(),
            ));
        }

        let dimensions = embedder
            .dimensions()
            .or_else(|| vectors.first().map(Vec::len))
            .unwrap_or_default();
        if dimensions == 0 {
            return Err(PartMatchError::indexing("embedder returned empty vectors"));
        }
        if let Some(bad) = vectors.iter().find(|vector| vector.len() != dimensions) {
            return Err(PartMatchError::indexing(
                EmbeddingError::DimensionMismatch {
                    expected: dimensions,
                    actual: bad.len(),
                }
                .to_string(),
            ));
        }

        #[cfg(feature = "semantic-search")]
        let index = LanceIndex::build(dimensions, &vectors).await?;

        let entries: Vec<IndexedEntry> = units
            .into_iter()
            .zip(vectors)
            .map(|(unit, vector)| IndexedEntry { unit, vector })
            .collect();
        let count = entries.len();

        let collection = Collection {
            name: name.to_string(),
            model_name: embedder.model_name().to_string(),
            dimensions,
            entries,
        };

        if self
            .collections
            .insert(
                name.to_string(),
                StoredCollection {
                    collection,
                    embedder,
                    #[cfg(feature = "semantic-search")]
                    index,
                },
            )
            .is_some()
        {
            tracing::debug!(collection = name, "Replaced existing collection");
        }

        Ok(count)
    }

    /// Best `k` matches for a text query, highest cosine similarity first.
    pub async fn similarity_search_with_score(
        &self,
        name: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let stored = self.stored(name)?;
        let embedder = Arc::clone(&stored.embedder);
        self.similarity_search_with_embedder(name, query, k, embedder.as_ref())
            .await
    }

    /// Like [`similarity_search_with_score`](Self::similarity_search_with_score)
    /// but with a caller-supplied embedder, which must match the collection's.
    pub async fn similarity_search_with_embedder(
        &self,
        name: &str,
        query: &str,
        k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(PartMatchError::validation(
                "query",
                "query description must not be empty",
            ));
        }
        if k == 0 {
            return Err(PartMatchError::validation("k", "k must be at least 1"));
        }

        let collection = &self.stored(name)?.collection;
        if collection.model_name != embedder.model_name() {
            return Err(PartMatchError::invalid_config(format!(
                "collection '{}' was built with '{}' but the query embedder is '{}'",
                name,
                collection.model_name,
                embedder.model_name()
            )));
        }

        let vector = embedder.embed_text(query).await?;
        self.search_by_vector(name, &vector, k).await
    }

    /// Best `k` matches for an already-embedded query.
    pub async fn search_by_vector(
        &self,
        name: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let stored = self.stored(name)?;
        let collection = &stored.collection;
        if vector.len() != collection.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: collection.dimensions,
                actual: vector.len(),
            }
            .into());
        }

        let ranked = stored.rank(vector, k).await?;

        Ok(ranked
            .into_iter()
            .map(|(index, score)| SearchResult {
                unit: collection.entries[index].unit.clone(),
                score,
            })
            .collect())
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name).map(|stored| &stored.collection)
    }

    /// Returns true if a collection was removed.
    pub fn delete_collection(&mut self, name: &str) -> bool {
        self.collections.remove(name).is_some()
    }

    fn stored(&self, name: &str) -> Result<&StoredCollection> {
        match self.collections.get(name) {
            Some(stored) if !stored.collection.is_empty() => Ok(stored),
            Some(_) => Err(PartMatchError::match_not_found(format!(
                "collection '{name}' is empty"
            ))),
            None => Err(PartMatchError::match_not_found(format!(
                "no index named '{name}'"
            ))),
        }
    }
}
