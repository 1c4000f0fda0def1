use serde::{Deserialize, Serialize};

use crate::error::{PartMatchError, Result};

/// An item in our own product catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique stock-keeping unit
    pub sku: String,
    /// Free-text product description
    #[serde(alias = "desc")]
    pub description: String,
}

impl CatalogItem {
    pub fn new(sku: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            description: description.into(),
        }
    }

    /// Catalog entries need both a SKU and a description to be indexable
    pub fn validate(&self) -> Result<()> {
        if self.sku.trim().is_empty() {
            return Err(PartMatchError::validation("sku", "catalog SKU must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(PartMatchError::validation(
                "description",
                format!("catalog item {} has an empty description", self.sku),
            ));
        }
        Ok(())
    }

    /// Convert into the unit handed to the vector store
    pub fn to_embeddable(&self) -> EmbeddableUnit {
        EmbeddableUnit {
            text: self.description.clone(),
            metadata: UnitMetadata {
                sku: self.sku.clone(),
            },
        }
    }
}

/// A competitor product that needs a counterpart from our catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorItem {
    pub sku: String,
    #[serde(alias = "desc")]
    pub description: String,
}

impl CompetitorItem {
    pub fn new(sku: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            description: description.into(),
        }
    }
}

/// Metadata carried alongside each indexed vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetadata {
    pub sku: String,
}

/// Text plus metadata, ready to be embedded and stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddableUnit {
    pub text: String,
    pub metadata: UnitMetadata,
}

impl EmbeddableUnit {
    /// Rebuild the catalog item this unit was derived from
    pub fn to_catalog_item(&self) -> CatalogItem {
        CatalogItem::new(self.metadata.sku.clone(), self.text.clone())
    }
}
