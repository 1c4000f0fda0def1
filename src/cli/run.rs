use std::io;

use anyhow::{Context, Result};

use crate::catalog::Dataset;
use crate::config::AppConfig;
use crate::embedding::create_embedder;
use crate::logging::log_error;
use crate::services::llm::create_client;
use crate::services::{Explainer, MatchPipeline, Reporter};

use super::RunArgs;

/// Handle the run command: index, match, explain, report.
///
/// Exits non-zero when matching stopped early, after printing what was matched.
pub async fn handle_run_command(args: RunArgs) -> Result<()> {
    let mut app = AppConfig::load()?;
    if let Some(provider) = args.embedding {
        app = app.with_embedding_provider(provider);
    }
    if let Some(collection) = args.collection {
        app = app.with_collection_name(collection);
    }

    let explain = !args.no_explain;
    app.validate(explain)?;

    let dataset = Dataset::load(args.input.as_deref()).with_context(|| match &args.input {
        Some(path) => format!("Failed to load input file {}", path.display()),
        None => "Failed to load built-in catalog".to_string(),
    })?;

    let embedder = create_embedder(&app.embedding, app.google_ai_config())?;
    let explainer = if explain {
        Explainer::new(create_client(app.llm_config())?)
    } else {
        Explainer::disabled()
    };

    let pipeline = MatchPipeline::new(embedder, explainer)
        .with_collection_name(app.collection_name.clone())
        .with_progress(atty::is(atty::Stream::Stderr));

    let report = pipeline.run(&dataset).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    Reporter::new(args.format).write_report(&mut out, &report.results)?;

    if let Some(failure) = report.failure {
        log_error(&failure, "matching", failure.category());
        anyhow::bail!(
            "matching stopped after {} of {} competitors: {}",
            report.results.len(),
            dataset.competitors.len(),
            failure
        );
    }

    Ok(())
}
