use std::sync::Arc;
use std::time::Instant;

use crate::catalog::validate_catalog;
use crate::embedding::Embedder;
use crate::error::{PartMatchError, Result};
use crate::logging::log_performance;
use crate::models::{CatalogItem, EmbeddableUnit};
use crate::vector_store::VectorStore;

/// Builds the catalog collection that competitor queries run against.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed every catalog item and store it under `collection`.
    ///
    /// Any failure here is an indexing error, including an invalid catalog.
    pub async fn index(
        &self,
        store: &mut VectorStore,
        collection: &str,
        catalog: &[CatalogItem],
    ) -> Result<usize> {
        let started = Instant::now();

        validate_catalog(catalog).map_err(|e| match e {
            PartMatchError::Validation { message, .. } => PartMatchError::indexing(message),
            other => other,
        })?;

        let units: Vec<EmbeddableUnit> = catalog.iter().map(CatalogItem::to_embeddable).collect();
        let result = store
            .create_collection(collection, units, Arc::clone(&self.embedder))
            .await;

        log_performance(
            "index_catalog",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );

        let count = result?;
        tracing::info!(
            collection = collection,
            items = count,
            model = self.embedder.model_name(),
            "Index built"
        );

        Ok(count)
    }
}
