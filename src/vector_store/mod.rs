//! Vector store with cosine similarity search.
//!
//! Collections are ranked by an exact in-process scan, or by a LanceDB table
//! when built with the `semantic-search` feature.

#[cfg(feature = "semantic-search")]
pub mod lance;
pub mod models;
pub mod similarity;
pub mod store;

pub use models::{Collection, IndexedEntry, SearchResult};
pub use similarity::{cosine_similarity, top_k};
pub use store::VectorStore;

#[cfg(feature = "semantic-search")]
pub use lance::LanceIndex;
