//! LanceDB nearest-neighbour index for one collection.

use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, UInt32Array};
use arrow_schema::{DataType, Field, Schema};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType, Table};
use uuid::Uuid;

use crate::error::{PartMatchError, Result};

const TABLE_NAME: &str = "catalog_embeddings";
const POSITION_COLUMN: &str = "position";
const VECTOR_COLUMN: &str = "vector";
const DISTANCE_COLUMN: &str = "_distance";

/// Arrow schema: insertion position plus the fixed-size embedding.
fn embeddings_schema(dimensions: usize) -> Schema {
    Schema::new(vec![
        Field::new(POSITION_COLUMN, DataType::UInt32, false),
        Field::new(
            VECTOR_COLUMN,
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dimensions as i32,
            ),
            false,
        ),
    ])
}

fn lance_error(context: &str, error: impl std::fmt::Display) -> PartMatchError {
    PartMatchError::indexing(format!("{context}: {error}"))
}

/// Table in a private in-memory LanceDB database.
///
/// Rows carry their insertion position, which breaks score ties.
pub struct LanceIndex {
    _connection: Connection,
    table: Table,
    rows: usize,
}

impl LanceIndex {
    pub async fn build(dimensions: usize, vectors: &[Vec<f32>]) -> Result<Self> {
        let uri = format!("memory://partmatch-{}", Uuid::new_v4());
        let connection = connect(&uri)
            .execute()
            .await
            .map_err(|e| lance_error("Failed to open LanceDB", e))?;

        let schema = Arc::new(embeddings_schema(dimensions));
        let rows = u32::try_from(vectors.len())
            .map_err(|_| PartMatchError::indexing("too many vectors for one collection"))?;
        let positions = UInt32Array::from_iter_values(0..rows);
        let embeddings = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            vectors
                .iter()
                .map(|vector| Some(vector.iter().copied().map(Some).collect::<Vec<_>>())),
            dimensions as i32,
        );

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(positions), Arc::new(embeddings)],
        )
        .map_err(|e| lance_error("Failed to build record batch", e))?;
        let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);

        let table = connection
            .create_table(TABLE_NAME, Box::new(batches))
            .execute()
            .await
            .map_err(|e| lance_error("Failed to create embeddings table", e))?;

        tracing::debug!(rows = vectors.len(), dimensions, "Built LanceDB index");

        Ok(Self {
            _connection: connection,
            table,
            rows: vectors.len(),
        })
    }

    /// `(position, cosine similarity)` pairs, best first.
    pub async fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        // Every row is fetched so ties at the cut-off resolve by position
        let mut stream = self
            .table
            .vector_search(query.to_vec())
            .map_err(|e| lance_error("Invalid vector query", e))?
            .distance_type(DistanceType::Cosine)
            .limit(self.rows)
            .execute()
            .await
            .map_err(|e| lance_error("Vector search failed", e))?;

        let mut ranked = Vec::with_capacity(self.rows);
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| lance_error("Failed to read search results", e))?
        {
            let positions = batch
                .column_by_name(POSITION_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<UInt32Array>())
                .ok_or_else(|| PartMatchError::indexing("search results lack positions"))?;
            let distances = batch
                .column_by_name(DISTANCE_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| PartMatchError::indexing("search results lack distances"))?;

            for row in 0..batch.num_rows() {
                let similarity = 1.0 - distances.value(row);
                // Zero vectors have no direction
                let similarity = if similarity.is_nan() {
                    0.0
                } else {
                    similarity.clamp(-1.0, 1.0)
                };
                ranked.push((positions.value(row) as usize, similarity));
            }
        }

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        Ok(ranked)
    }
}
