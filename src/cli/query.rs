use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::catalog::Dataset;
use crate::config::AppConfig;
use crate::embedding::{create_embedder, EmbeddingProvider};
use crate::services::{Explainer, MatchPipeline};

/// Handle the query command: top-k catalog items for one description
pub async fn handle_query_command(
    description: String,
    k: usize,
    input: Option<PathBuf>,
    embedding: Option<EmbeddingProvider>,
) -> Result<()> {
    let mut app = AppConfig::load()?;
    if let Some(provider) = embedding {
        app = app.with_embedding_provider(provider);
    }
    app.validate(false)?;

    let dataset = Dataset::load(input.as_deref())?;
    let embedder = create_embedder(&app.embedding, app.google_ai_config())?;
    let pipeline = MatchPipeline::new(embedder, Explainer::disabled())
        .with_collection_name(app.collection_name.clone());

    let results = pipeline.search(&dataset.catalog, &description, k).await?;

    println!(
        "{} {}",
        style("Query:").bold(),
        style(&description).cyan()
    );
    println!();
    for (rank, hit) in results.iter().enumerate() {
        println!(
            "  {}. {}  {}  {}",
            rank + 1,
            style(hit.sku()).green().bold(),
            style(format!("{:.4}", hit.score)).yellow(),
            hit.unit.text
        );
    }

    Ok(())
}
