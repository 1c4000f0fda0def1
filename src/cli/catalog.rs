use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::catalog::Dataset;

/// Handle the catalog command
pub async fn handle_catalog_command(input: Option<PathBuf>) -> Result<()> {
    let dataset = Dataset::load(input.as_deref())?;

    let source = match &input {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };

    println!(
        "{} ({} items, {})",
        style("Catalog").bold(),
        dataset.catalog.len(),
        style(&source).dim()
    );
    for item in &dataset.catalog {
        println!("  {}  {}", style(&item.sku).green(), item.description);
    }

    println!();
    println!(
        "{} ({} items)",
        style("Competitors").bold(),
        dataset.competitors.len()
    );
    if dataset.competitors.is_empty() {
        println!("  {}", style("none").dim());
    }
    for item in &dataset.competitors {
        println!("  {}  {}", style(&item.sku).cyan(), item.description);
    }

    Ok(())
}
