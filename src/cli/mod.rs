pub mod catalog;
pub mod config;
pub mod query;
pub mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::embedding::EmbeddingProvider;
use crate::services::ReportFormat;

#[derive(Parser)]
#[command(name = "partmatch")]
#[command(about = "Match competitor parts against our catalog and explain each match")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index the catalog, match every competitor item and print the report
    ///
    /// Examples:
    ///   partmatch run
    ///   partmatch run --input parts.json --format json
    ///   partmatch run --embedding hashing --no-explain
    Run(RunArgs),

    /// Show the closest catalog items for a single description
    Query {
        /// Competitor description to look up
        description: String,

        /// Number of results to show
        #[arg(short, default_value_t = 5)]
        k: usize,

        /// JSON file with `catalog` (and optionally `competitors`) lists
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Embedding provider: google-ai, local, hashing
        #[arg(long)]
        embedding: Option<EmbeddingProvider>,
    },

    /// Print the catalog and competitor lists that a run would use
    Catalog {
        /// JSON file with `catalog` and `competitors` lists
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON file with `catalog` and `competitors` lists
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Name of the vector collection to build
    #[arg(long)]
    pub collection: Option<String>,

    /// Embedding provider: google-ai, local, hashing
    #[arg(long)]
    pub embedding: Option<EmbeddingProvider>,

    /// Skip the LLM explanation stage
    #[arg(long)]
    pub no_explain: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a config value
    Get {
        /// Config key (e.g., google-ai-api-key, llm.model)
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key (e.g., google-ai-api-key, embedding.provider)
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a config value
    Unset {
        /// Config key to remove
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let rt = Runtime::new()?;

        rt.block_on(async {
            match self.command {
                Commands::Run(args) => run::handle_run_command(args).await,
                Commands::Query {
                    description,
                    k,
                    input,
                    embedding,
                } => query::handle_query_command(description, k, input, embedding).await,
                Commands::Catalog { input } => catalog::handle_catalog_command(input).await,
                Commands::Config { command } => match command {
                    ConfigCommands::Get { key } => config::handle_config_get(key).await,
                    ConfigCommands::Set { key, value } => {
                        config::handle_config_set(key, value).await
                    }
                    ConfigCommands::Unset { key } => config::handle_config_unset(key).await,
                    ConfigCommands::List => config::handle_config_list().await,
                    ConfigCommands::Path => config::handle_config_path().await,
                },
            }
        })
    }
}
