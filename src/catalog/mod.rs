//! Catalog loading
//!
//! Holds the built-in product lists and loads replacement lists from a JSON
//! input file of the form `{ "catalog": [...], "competitors": [...] }`.

mod defaults;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PartMatchError, Result};
use crate::models::{CatalogItem, CompetitorItem};

pub use defaults::{default_catalog, default_competitors, DEFAULT_COLLECTION_NAME};

/// Catalog plus the competitor items to match against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub catalog: Vec<CatalogItem>,
    #[serde(default)]
    pub competitors: Vec<CompetitorItem>,
}

impl Dataset {
    /// The built-in electronic component lists
    pub fn builtin() -> Self {
        Self {
            catalog: default_catalog(),
            competitors: default_competitors(),
        }
    }

    /// Load a dataset from a JSON file and validate it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&contents)?;
        dataset.validate()?;

        tracing::info!(
            path = %path.display(),
            catalog = dataset.catalog.len(),
            competitors = dataset.competitors.len(),
            "Loaded dataset"
        );

        Ok(dataset)
    }

    /// Load from `path` when given, otherwise use the built-in lists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_catalog(&self.catalog)?;

        for competitor in &self.competitors {
            if competitor.sku.trim().is_empty() {
                return Err(PartMatchError::validation(
                    "sku",
                    "competitor SKU must not be empty",
                ));
            }
        }

        Ok(())
    }
}

/// Check a catalog is non-empty, fully populated and has unique SKUs
pub fn validate_catalog(catalog: &[CatalogItem]) -> Result<()> {
    if catalog.is_empty() {
        return Err(PartMatchError::validation("catalog", "catalog is empty"));
    }

    let mut seen = HashSet::with_capacity(catalog.len());
    for item in catalog {
        item.validate()?;
        if !seen.insert(item.sku.as_str()) {
            return Err(PartMatchError::validation(
                "sku",
                format!("duplicate catalog SKU: {}", item.sku),
            ));
        }
    }

    Ok(())
}
