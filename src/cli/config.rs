use anyhow::Result;
use console::style;

use crate::config::{mask_api_key, AppConfig, Config, CONFIG_KEYS};

/// Print one stored value, or the effective default when the key is unset
pub async fn handle_config_get(key: String) -> Result<()> {
    let config = Config::load()?;

    if let Some(value) = config.get(&key) {
        println!("{value}");
        return Ok(());
    }

    if !CONFIG_KEYS.contains(&key.as_str()) {
        anyhow::bail!(
            "Unknown config key '{key}'. Available keys: {}",
            CONFIG_KEYS.join(", ")
        );
    }

    match effective_default(&key) {
        Some(default) => println!("{} {}", default, style("(default)").dim()),
        None => anyhow::bail!("Config key '{key}' not set"),
    }
    Ok(())
}

/// Validate and store a value in the config file
pub async fn handle_config_set(key: String, value: String) -> Result<()> {
    let mut config = Config::load()?;
    config.set(&key, value)?;
    config.save()?;

    let shown = match config.get(&key) {
        Some(stored) if key.replace('_', "-").ends_with("api-key") => mask_api_key(&stored),
        Some(stored) => stored,
        None => String::new(),
    };
    println!(
        "{} {} = {}",
        style("✓").green(),
        style(&key).cyan(),
        style(shown).dim()
    );
    println!(
        "  Saved to: {}",
        style(Config::get_config_path()?.display()).dim()
    );

    Ok(())
}

pub async fn handle_config_unset(key: String) -> Result<()> {
    let mut config = Config::load()?;
    config.unset(&key)?;
    config.save()?;

    println!("{} {} removed", style("✓").green(), style(&key).cyan());
    if let Some(default) = effective_default(&key) {
        println!("  Falls back to: {}", style(default).dim());
    }

    Ok(())
}

/// Stored values, then the settings a run would actually use
pub async fn handle_config_list() -> Result<()> {
    let config = Config::load()?;
    let items = config.list();

    if items.is_empty() {
        println!("{}", style("No values stored.").dim());
        println!(
            "  {}",
            style("partmatch config set google-ai-api-key YOUR_KEY").cyan()
        );
    } else {
        println!("{}", style("Stored:").bold());
        for (key, value) in items {
            println!("  {} = {}", style(key).cyan(), style(value).dim());
        }
    }

    let app = AppConfig::load()?;
    println!();
    println!("{}", style("Effective (file + environment):").bold());
    println!(
        "  api key            {}",
        match &app.google_ai_api_key {
            Some(key) => style(mask_api_key(key)).green(),
            None => style("missing".to_string()).red(),
        }
    );
    println!(
        "  embedding          {} / {}",
        app.embedding.provider,
        app.embedding.model_name()
    );
    println!(
        "  llm                {} ({}s timeout, {} retries)",
        app.llm_model, app.llm_timeout_secs, app.llm_max_retries
    );
    println!("  collection         {}", app.collection_name);
    println!();
    println!(
        "  Config file: {}",
        style(Config::get_config_path()?.display()).dim()
    );

    Ok(())
}

pub async fn handle_config_path() -> Result<()> {
    println!("{}", Config::get_config_path()?.display());
    Ok(())
}

fn effective_default(key: &str) -> Option<String> {
    let defaults = AppConfig::default();
    match key {
        "embedding.provider" => Some(defaults.embedding.provider.to_string()),
        "embedding.model" => Some(defaults.embedding.model_name()),
        "llm.model" => Some(defaults.llm_model),
        "llm.timeout-secs" => Some(defaults.llm_timeout_secs.to_string()),
        "llm.max-retries" => Some(defaults.llm_max_retries.to_string()),
        "pipeline.collection-name" => Some(defaults.collection_name),
        _ => None,
    }
}
