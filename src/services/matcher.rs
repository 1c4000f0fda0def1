use crate::error::{PartMatchError, Result};
use crate::models::{CatalogItem, CompetitorItem, MatchResult};
use crate::vector_store::VectorStore;

/// Finds the closest catalog item for competitor descriptions.
pub struct Matcher<'a> {
    store: &'a VectorStore,
    collection: String,
}

/// Matches completed before the first failure, plus that failure if any.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub results: Vec<MatchResult>,
    pub failure: Option<PartMatchError>,
}

impl<'a> Matcher<'a> {
    pub fn new(store: &'a VectorStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Single nearest catalog item and its cosine similarity.
    pub async fn best_match(&self, query: &str) -> Result<(CatalogItem, f32)> {
        let results = self
            .store
            .similarity_search_with_score(&self.collection, query, 1)
            .await?;

        results
            .into_iter()
            .next()
            .map(|hit| (hit.item(), hit.score))
            .ok_or_else(|| {
                PartMatchError::match_not_found(format!(
                    "no match in collection '{}'",
                    self.collection
                ))
            })
    }

    pub async fn match_competitor(&self, competitor: &CompetitorItem) -> Result<MatchResult> {
        if competitor.description.trim().is_empty() {
            return Err(PartMatchError::validation(
                "description",
                format!("competitor {} has an empty description", competitor.sku),
            ));
        }

        let (item, score) = self.best_match(&competitor.description).await?;

        tracing::info!(
            competitor = %competitor.sku,
            matched = %item.sku,
            score = score,
            "Matched competitor"
        );

        Ok(MatchResult::new(competitor, &item, score))
    }

    /// Match competitors in order, stopping at the first error.
    pub async fn match_all(&self, competitors: &[CompetitorItem]) -> MatchOutcome {
        let mut outcome = MatchOutcome {
            results: Vec::with_capacity(competitors.len()),
            failure: None,
        };

        for competitor in competitors {
            match self.match_competitor(competitor).await {
                Ok(result) => outcome.results.push(result),
                Err(e) => {
                    tracing::error!(
                        competitor = %competitor.sku,
                        error = %e,
                        "Matching stopped"
                    );
                    outcome.failure = Some(e);
                    break;
                }
            }
        }

        outcome
    }
}
