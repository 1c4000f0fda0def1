pub mod match_result;
pub mod product;

pub use match_result::{ExplainedMatch, Explanation, MatchResult};
pub use product::{CatalogItem, CompetitorItem, EmbeddableUnit, UnitMetadata};
