use serde::{Deserialize, Serialize};
use std::fmt;

use super::product::{CatalogItem, CompetitorItem};

/// Best catalog match found for one competitor item
///
/// Created once by the matcher and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub competitor_sku: String,
    pub competitor_description: String,
    pub matched_sku: String,
    pub matched_description: String,
    /// Cosine similarity in [-1, 1], higher is more similar
    pub similarity_score: f32,
}

impl MatchResult {
    pub fn new(competitor: &CompetitorItem, matched: &CatalogItem, similarity_score: f32) -> Self {
        Self {
            competitor_sku: competitor.sku.clone(),
            competitor_description: competitor.description.clone(),
            matched_sku: matched.sku.clone(),
            matched_description: matched.description.clone(),
            similarity_score,
        }
    }
}

/// Outcome of asking the generative model about a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Explanation {
    /// Model output, stored verbatim
    Generated(String),
    /// Placeholder kept when generation failed or was skipped
    Unavailable(String),
}

impl Explanation {
    pub fn is_generated(&self) -> bool {
        matches!(self, Explanation::Generated(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Explanation::Generated(text) | Explanation::Unavailable(text) => text,
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Explanation::Generated(text) => write!(f, "{text}"),
            Explanation::Unavailable(reason) => write!(f, "[explanation unavailable: {reason}]"),
        }
    }
}

/// A match together with its explanation, as consumed by the reporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainedMatch {
    #[serde(flatten)]
    pub result: MatchResult,
    pub explanation: Explanation,
}

impl ExplainedMatch {
    pub fn new(result: MatchResult, explanation: Explanation) -> Self {
        Self {
            result,
            explanation,
        }
    }
}
