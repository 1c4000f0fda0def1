use std::sync::Arc;

use indicatif::ProgressBar;

use crate::error::{PartMatchError, Result};
use crate::models::{ExplainedMatch, Explanation, MatchResult};
use crate::services::llm::{GenerateRequest, LlmClient, LlmError};

pub const EXPLANATION_DISABLED: &str = "explanation disabled";

/// Render the question sent to the generative model for one match.
///
/// Only the two descriptions and the score go into the prompt.
pub fn build_prompt(result: &MatchResult) -> String {
    format!(
        "I have this competitor component: \"{}\".\n\
         I matched it to our component: \"{}\" with similarity score {:.2}.\n\
         Please analyze the differences in specs, and tell me whether this match is good, and what are the spec-gaps.\n",
        result.competitor_description, result.matched_description, result.similarity_score
    )
}

/// Asks an LLM to judge each match.
///
/// A failure affects only its own record, which keeps an
/// [`Explanation::Unavailable`] placeholder.
pub struct Explainer {
    client: Option<Arc<dyn LlmClient>>,
}

impl Explainer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Explainer that never calls a model.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Reject unusable credentials before any work is done.
    ///
    /// Transient failures only warn: the per-record calls retry on their own.
    pub async fn check_ready(&self) -> Result<()> {
        let Some(client) = &self.client else {
            return Ok(());
        };

        match client.health_check().await {
            Ok(()) => Ok(()),
            Err(e @ (LlmError::AuthenticationFailed { .. } | LlmError::QuotaExceeded { .. })) => {
                Err(PartMatchError::invalid_config(format!(
                    "{} model '{}' rejected the credentials: {}",
                    client.provider_name(),
                    client.model_name(),
                    e.user_message()
                )))
            }
            Err(e @ (LlmError::ConfigurationError { .. } | LlmError::InvalidRequest { .. })) => {
                Err(e.into())
            }
            Err(e) => {
                tracing::warn!(
                    provider = client.provider_name(),
                    error = %e,
                    "LLM health check failed, continuing"
                );
                Ok(())
            }
        }
    }

    pub async fn explain(&self, result: MatchResult) -> ExplainedMatch {
        let Some(client) = &self.client else {
            return ExplainedMatch::new(
                result,
                Explanation::Unavailable(EXPLANATION_DISABLED.to_string()),
            );
        };

        let explanation = match request_explanation(client.as_ref(), &result).await {
            Ok(text) => Explanation::Generated(text),
            Err(PartMatchError::Explanation { message }) => Explanation::Unavailable(message),
            Err(other) => Explanation::Unavailable(other.to_string()),
        };

        ExplainedMatch::new(result, explanation)
    }

    /// Explain every match in order, advancing `progress` after each.
    pub async fn explain_all(
        &self,
        results: Vec<MatchResult>,
        progress: Option<&ProgressBar>,
    ) -> Vec<ExplainedMatch> {
        let mut explained = Vec::with_capacity(results.len());

        for result in results {
            if let Some(pb) = progress {
                pb.set_message(result.competitor_sku.clone());
            }
            explained.push(self.explain(result).await);
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        let generated = explained
            .iter()
            .filter(|m| m.explanation.is_generated())
            .count();
        tracing::info!(
            total = explained.len(),
            generated = generated,
            "Explanations finished"
        );

        explained
    }
}

async fn request_explanation(client: &dyn LlmClient, result: &MatchResult) -> Result<String> {
    client
        .generate(GenerateRequest::new(build_prompt(result)))
        .await
        .map(|response| response.text)
        .map_err(|e| {
            tracing::warn!(
                competitor = %result.competitor_sku,
                provider = client.provider_name(),
                error = %e,
                "Explanation unavailable"
            );
            PartMatchError::explanation(e.user_message())
        })
}
