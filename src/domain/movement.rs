//! Stock movement ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    In,
    Out,
    Adjust,
}

impl MovementKind {
    /// Stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Adjust => "adjust",
        }
    }

    /// Parse the stored/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "adjust" => Some(Self::Adjust),
            _ => None,
        }
    }

    /// Signed stock delta this movement applies. Inbound adds, outbound
    /// subtracts, adjustments carry their own sign.
    pub fn stock_delta(&self, quantity: i64) -> i64 {
        match self {
            Self::In => quantity,
            Self::Out => -quantity,
            Self::Adjust => quantity,
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable ledger entry recording a stock movement.
///
/// `product_name` is read-side enrichment joined onto the row; it is never
/// written and takes no part in the write transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i64,
    pub unit_price: Option<f64>,
    pub total_amount: Option<f64>,
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to append a movement to the ledger.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: i64,
    pub unit_price: Option<f64>,
    pub total_amount: Option<f64>,
    pub reason: Option<String>,
}
