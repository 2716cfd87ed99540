//! Sales ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable ledger entry recording a completed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to record a sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
}

/// Lifetime and same-day sales aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales: u64,
    pub total_revenue: f64,
    pub today_sales: u64,
    pub today_revenue: f64,
}
