//! Product entity and its write shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Pen,
    Paper,
    Office,
    Other,
}

impl ProductCategory {
    /// Stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Paper => "paper",
            Self::Office => "office",
            Self::Other => "other",
        }
    }

    /// Parse the stored/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pen" => Some(Self::Pen),
            "paper" => Some(Self::Paper),
            "office" => Some(Self::Office),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable item. `stock` is mutated only as a side effect of a committed
/// movement or sale creation, never through a generic update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub description: Option<String>,
    pub unit: String,
    pub price: f64,
    pub cost: f64,
    pub stock: i64,
    pub min_stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub description: Option<String>,
    pub unit: String,
    pub price: f64,
    pub cost: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
}

/// Partial update of a product's mutable fields. Identifier, timestamps and
/// stock are never patchable; stock only moves through the ledger.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<ProductCategory>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub min_stock: Option<i64>,
}

impl ProductPatch {
    /// True when no field is set; the repository treats this as a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.unit.is_none()
            && self.price.is_none()
            && self.cost.is_none()
            && self.min_stock.is_none()
    }
}

/// Catalog-level aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: u64,
    pub low_stock_products: u64,
    /// Total inventory value at cost (sum of stock * cost).
    pub total_value: f64,
}
