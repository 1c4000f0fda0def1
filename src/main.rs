use clap::Parser;
use partmatch::cli::Cli;
use partmatch::logging;

fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (ignore errors if missing)
    dotenvy::dotenv().ok();

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = logging::init_from_env()?;

    let cli = Cli::parse();
    cli.run()
}
