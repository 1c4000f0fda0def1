pub mod explainer;
pub mod google_ai;
pub mod indexer;
pub mod llm;
pub mod matcher;
pub mod pipeline;
pub mod reporter;

pub use explainer::{build_prompt, Explainer, EXPLANATION_DISABLED};
pub use indexer::Indexer;
pub use matcher::{MatchOutcome, Matcher};
pub use pipeline::{MatchPipeline, PipelineReport};
pub use reporter::{ReportFormat, Reporter};
