use async_trait::async_trait;
use partmatch::catalog::Dataset;
use partmatch::config::{AppConfig, Config};
use partmatch::embedding::{EmbeddingProvider, HashingEmbedder};
use partmatch::models::{CatalogItem, CompetitorItem, Explanation};
use partmatch::services::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError};
use partmatch::services::reporter::SEPARATOR;
use partmatch::services::{Explainer, MatchPipeline, ReportFormat, Reporter};
use partmatch::PartMatchError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Fails the n-th call (1-based) with a rate limit, answers the rest
struct FlakyLlm {
    fail_on: usize,
    calls: AtomicUsize,
    key_rejected: bool,
}

impl FlakyLlm {
    fn failing_on(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: AtomicUsize::new(0),
            key_rejected: false,
        }
    }

    fn with_rejected_key() -> Self {
        Self {
            key_rejected: true,
            ..Self::failing_on(0)
        }
    }
}

#[async_trait]
impl LlmClient for FlakyLlm {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(LlmError::RateLimitExceeded {
                message: "429 Too Many Requests".to_string(),
            });
        }
        Ok(GenerateResponse::text("looks equivalent"))
    }

    fn provider_name(&self) -> &'static str {
        "flaky"
    }

    fn model_name(&self) -> &str {
        "flaky-model"
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        if self.key_rejected {
            return Err(LlmError::AuthenticationFailed {
                message: "API key not valid".to_string(),
            });
        }
        Ok(())
    }
}

fn hashing_pipeline(explainer: Explainer) -> MatchPipeline {
    MatchPipeline::new(Arc::new(HashingEmbedder::default()), explainer)
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[tokio::test]
async fn test_llm_failure_affects_only_its_record() {
    let llm = Arc::new(FlakyLlm::failing_on(3));
    let report = hashing_pipeline(Explainer::new(llm.clone()))
        .run(&Dataset::builtin())
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.results.len(), 6);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 6);
    assert_eq!(report.explained_count(), 5);

    assert_eq!(report.results[2].result.competitor_sku, "C105");
    assert_eq!(
        report.results[2].explanation,
        Explanation::Unavailable("rate limit exceeded".to_string())
    );
    assert_eq!(
        report.results[3].explanation,
        Explanation::Generated("looks equivalent".to_string())
    );

    let text = Reporter::new(ReportFormat::Text)
        .render(&report.results)
        .unwrap();
    assert!(text.contains("Explanation: [explanation unavailable: rate limit exceeded]"));
    assert_eq!(text.matches(SEPARATOR).count(), 6);
}

#[tokio::test]
async fn test_rejected_key_fails_before_indexing() {
    let llm = Arc::new(FlakyLlm::with_rejected_key());

    let err = hashing_pipeline(Explainer::new(llm.clone()))
        .run(&Dataset::builtin())
        .await
        .unwrap_err();

    assert!(matches!(err, PartMatchError::InvalidConfig { .. }));
    assert!(err.to_string().contains("flaky-model"));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_competitor_description_stops_matching() {
    let mut dataset = Dataset::builtin();
    dataset
        .competitors
        .insert(3, CompetitorItem::new("C107", "   "));
    let llm = Arc::new(FlakyLlm::failing_on(0));

    let report = hashing_pipeline(Explainer::new(llm.clone()))
        .run(&dataset)
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.results.len(), 3);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.explained_count(), 3);

    let failure = report.failure.unwrap();
    assert!(matches!(failure, PartMatchError::Validation { .. }));
    assert!(failure.to_string().contains("C107"));
}

#[tokio::test]
async fn test_empty_catalog_is_indexing_error() {
    let dataset = Dataset {
        catalog: Vec::new(),
        competitors: vec![CompetitorItem::new("C101", "Capacitor")],
    };

    let err = hashing_pipeline(Explainer::disabled())
        .run(&dataset)
        .await
        .unwrap_err();

    assert!(matches!(err, PartMatchError::Indexing { .. }));
    assert_eq!(err.category(), "indexing");
}

#[tokio::test]
async fn test_duplicate_catalog_sku_is_indexing_error() {
    let dataset = Dataset {
        catalog: vec![
            CatalogItem::new("Y001", "Relay 5V"),
            CatalogItem::new("Y001", "Relay 12V"),
        ],
        competitors: Vec::new(),
    };

    let err = hashing_pipeline(Explainer::disabled())
        .run(&dataset)
        .await
        .unwrap_err();

    assert!(matches!(err, PartMatchError::Indexing { .. }));
}

#[tokio::test]
async fn test_no_competitors_gives_empty_report() {
    let dataset = Dataset {
        catalog: Dataset::builtin().catalog,
        competitors: Vec::new(),
    };

    let report = hashing_pipeline(Explainer::disabled())
        .run(&dataset)
        .await
        .unwrap();

    assert!(report.is_complete());
    assert!(report.results.is_empty());
    assert_eq!(
        Reporter::new(ReportFormat::Text)
            .render(&report.results)
            .unwrap(),
        ""
    );
}

#[test]
fn test_missing_api_key_fails_validation_when_explaining() {
    let app = AppConfig::resolve(
        &Config::default(),
        env_from(&[("PARTMATCH_EMBEDDING_PROVIDER", "hashing")]),
    )
    .unwrap();

    let err = app.validate(true).unwrap_err();
    assert!(matches!(err, PartMatchError::InvalidConfig { .. }));
    assert!(err.to_string().contains("GOOGLE_AI_API_KEY"));

    assert!(app.validate(false).is_ok());
}

#[test]
fn test_google_embeddings_need_a_key_even_without_explanations() {
    let app = AppConfig::resolve(&Config::default(), env_from(&[])).unwrap();

    assert_eq!(app.embedding.provider, EmbeddingProvider::GoogleAi);
    assert!(app.validate(false).is_err());
}

#[test]
fn test_unknown_provider_in_env_is_config_error() {
    let err = AppConfig::resolve(
        &Config::default(),
        env_from(&[("PARTMATCH_EMBEDDING_PROVIDER", "word2vec")]),
    )
    .unwrap_err();

    assert!(matches!(err, PartMatchError::InvalidConfig { .. }));
}

#[test]
fn test_config_file_round_trip_and_env_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set("google-ai-api-key", "AIzaFileKey1234567".to_string())
        .unwrap();
    config.set("embedding.provider", "hash".to_string()).unwrap();
    config
        .set("pipeline.collection-name", "parts".to_string())
        .unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.get("embedding.provider").as_deref(), Some("hashing"));

    let listed = loaded.list();
    assert_eq!(listed[0].0, "google-ai-api-key");
    assert_eq!(listed[0].1, "AIza...4567");

    let app = AppConfig::resolve(
        &loaded,
        env_from(&[("GOOGLE_AI_API_KEY", "AIzaEnvKey"), ("PARTMATCH_LLM_MODEL", "")]),
    )
    .unwrap();
    assert_eq!(app.google_ai_api_key.as_deref(), Some("AIzaEnvKey"));
    assert_eq!(app.embedding.provider, EmbeddingProvider::Hashing);
    assert_eq!(app.collection_name, "parts");
    assert_eq!(app.llm_model, "gemini-2.5-flash-lite");
}

#[cfg(unix)]
#[test]
fn test_saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    Config::default().save_to(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_invalid_config_values_are_rejected() {
    let mut config = Config::default();

    assert!(config.set("llm.timeout-secs", "soon".to_string()).is_err());
    assert!(config.set("llm.timeout-secs", "0".to_string()).is_err());
    assert!(config.set("embedding.provider", "word2vec".to_string()).is_err());
    assert!(config.set("no.such.key", "x".to_string()).is_err());
    assert_eq!(config, Config::default());
}
