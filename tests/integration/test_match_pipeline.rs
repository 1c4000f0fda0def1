use async_trait::async_trait;
use partmatch::catalog::Dataset;
use partmatch::embedding::HashingEmbedder;
use partmatch::models::Explanation;
use partmatch::services::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError};
use partmatch::services::reporter::SEPARATOR;
use partmatch::services::{build_prompt, Explainer, MatchPipeline, ReportFormat, Reporter};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// LLM client that records every prompt and answers with a fixed verdict
#[derive(Default)]
struct RecordingLlm {
    prompts: Mutex<Vec<String>>,
}

impl RecordingLlm {
    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for RecordingLlm {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(request.prompt);
        Ok(GenerateResponse::text(format!("verdict #{}", prompts.len())))
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }

    fn model_name(&self) -> &str {
        "recording-model"
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

fn pipeline_with(llm: Arc<RecordingLlm>) -> MatchPipeline {
    MatchPipeline::new(Arc::new(HashingEmbedder::default()), Explainer::new(llm))
}

#[tokio::test]
async fn test_builtin_run_matches_expected_catalog_items() {
    let llm = Arc::new(RecordingLlm::default());
    let report = pipeline_with(llm.clone())
        .run(&Dataset::builtin())
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.indexed, 10);

    let pairs: Vec<(&str, &str)> = report
        .results
        .iter()
        .map(|m| {
            (
                m.result.competitor_sku.as_str(),
                m.result.matched_sku.as_str(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("C101", "Y001"),
            ("C104", "Y004"),
            ("C105", "Y005"),
            ("C106", "Y006"),
            ("C108", "Y008"),
            ("C110", "Y010"),
        ]
    );

    for explained in &report.results {
        let score = explained.result.similarity_score;
        assert!(score.is_finite());
        assert!((-1.0..=1.0).contains(&score));
    }
}

#[tokio::test]
async fn test_every_match_is_explained_in_order() {
    let llm = Arc::new(RecordingLlm::default());
    let report = pipeline_with(llm.clone())
        .run(&Dataset::builtin())
        .await
        .unwrap();

    assert_eq!(report.explained_count(), 6);
    assert_eq!(llm.prompts().len(), 6);
    for (index, explained) in report.results.iter().enumerate() {
        assert_eq!(
            explained.explanation,
            Explanation::Generated(format!("verdict #{}", index + 1))
        );
    }
}

#[tokio::test]
async fn test_prompt_carries_descriptions_and_rounded_score() {
    let llm = Arc::new(RecordingLlm::default());
    let report = pipeline_with(llm.clone())
        .run(&Dataset::builtin())
        .await
        .unwrap();

    let prompts = llm.prompts();
    let last = &report.results[5].result;
    assert_eq!(prompts[5], build_prompt(last));
    assert!(prompts[5].contains("\"LM7805 fixed 5V output regulator TO-220\""));
    assert!(prompts[5].contains("\"Voltage Regulator LM7805, fixed 5V output, TO-220, ~1A\""));
    assert!(prompts[5].contains("with similarity score 0.88."));
    assert!(prompts[5].contains("spec-gaps"));
    assert!(!prompts[5].contains("Y010"));
}

#[tokio::test]
async fn test_text_report_blocks() {
    let llm = Arc::new(RecordingLlm::default());
    let report = pipeline_with(llm)
        .run(&Dataset::builtin())
        .await
        .unwrap();

    let text = Reporter::new(ReportFormat::Text)
        .render(&report.results)
        .unwrap();
    let blocks: Vec<&str> = text
        .split(&format!("{SEPARATOR}\n"))
        .filter(|block| !block.is_empty())
        .collect();

    assert_eq!(blocks.len(), 6);
    let first: Vec<&str> = blocks[0].lines().collect();
    assert_eq!(first[0], "Competitor SKU: C101");
    assert_eq!(first[1], "Our SKU: Y001");
    assert_eq!(
        first[2],
        "Our Description: Electrolytic Capacitor 100µF ±10%, 50V, radial, Ø5mm ×11mm"
    );
    assert!(first[3].starts_with("Similarity: 0."));
    assert_eq!(first[4], "Explanation: verdict #1");
}

#[tokio::test]
async fn test_json_report_is_an_array_of_flat_records() {
    let llm = Arc::new(RecordingLlm::default());
    let report = pipeline_with(llm)
        .run(&Dataset::builtin())
        .await
        .unwrap();

    let json = Reporter::new(ReportFormat::Json)
        .render(&report.results)
        .unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let records = value.as_array().unwrap();

    assert_eq!(records.len(), 6);
    assert_eq!(records[3]["competitor_sku"], "C106");
    assert_eq!(records[3]["matched_sku"], "Y006");
    assert_eq!(records[3]["explanation"]["status"], "generated");
    assert!(records[3]["similarity_score"].as_f64().unwrap() > 0.5);
}

#[tokio::test]
async fn test_disabled_explainer_never_calls_model() {
    let pipeline = MatchPipeline::new(Arc::new(HashingEmbedder::default()), Explainer::disabled())
        .with_collection_name("parts");
    let report = pipeline.run(&Dataset::builtin()).await.unwrap();

    assert_eq!(pipeline.collection_name(), "parts");
    assert_eq!(report.results.len(), 6);
    assert_eq!(report.explained_count(), 0);
    assert!(report
        .results
        .iter()
        .all(|m| m.explanation == Explanation::Unavailable("explanation disabled".to_string())));
}

#[tokio::test]
async fn test_search_returns_ranked_catalog_items() {
    let pipeline = MatchPipeline::new(Arc::new(HashingEmbedder::default()), Explainer::disabled());
    let results = pipeline
        .search(&Dataset::builtin().catalog, "LM7805 regulator", 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].sku(), "Y010");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn test_each_run_gets_its_own_id() {
    let pipeline = MatchPipeline::new(Arc::new(HashingEmbedder::default()), Explainer::disabled());
    let first = pipeline.run(&Dataset::builtin()).await.unwrap();
    let second = pipeline.run(&Dataset::builtin()).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(
        first
            .results
            .iter()
            .map(|m| m.result.similarity_score)
            .collect::<Vec<_>>(),
        second
            .results
            .iter()
            .map(|m| m.result.similarity_score)
            .collect::<Vec<_>>()
    );
}
