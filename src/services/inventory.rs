//! Stock mutation service.
//!
//! The sole sanctioned caller of the movement write path: validates inputs,
//! fills in default reasons, and delegates to the ledger store.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Movement, MovementKind, NewMovement, Page, PageRequest};
use crate::errors::{Error, Result};
use crate::interfaces::MovementStore;

use super::{validate_id, validate_page, validate_quantity};

/// Reason recorded for a stock-in when the caller gives none.
const DEFAULT_STOCK_IN_REASON: &str = "restock";
/// Reason recorded for a stock-out when the caller gives none.
const DEFAULT_STOCK_OUT_REASON: &str = "shipment";

/// Stock mutation service over the movement ledger.
#[derive(Clone)]
pub struct InventoryService {
    movements: Arc<dyn MovementStore>,
}

impl InventoryService {
    pub fn new(movements: Arc<dyn MovementStore>) -> Self {
        Self { movements }
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Movement>> {
        validate_page(page)?;
        self.movements.find_all(page).await
    }

    pub async fn list_by_product(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Movement>> {
        validate_id(product_id, "product")?;
        validate_page(page)?;
        self.movements.find_by_product(product_id, page).await
    }

    pub async fn list_by_kind(
        &self,
        kind: MovementKind,
        page: PageRequest,
    ) -> Result<Page<Movement>> {
        validate_page(page)?;
        self.movements.find_by_kind(kind, page).await
    }

    /// Record an inbound movement and increase stock.
    pub async fn stock_in(
        &self,
        product_id: &str,
        quantity: i64,
        unit_price: f64,
        reason: Option<String>,
    ) -> Result<Movement> {
        validate_id(product_id, "product")?;
        validate_quantity(quantity)?;
        if unit_price < 0.0 {
            return Err(Error::validation("unit price must not be negative"));
        }

        info!(product_id = %product_id, quantity, unit_price, "stock in");

        self.movements
            .create(NewMovement {
                product_id: product_id.to_string(),
                kind: MovementKind::In,
                quantity,
                unit_price: Some(unit_price),
                total_amount: Some(quantity as f64 * unit_price),
                reason: Some(normalize_reason(reason, DEFAULT_STOCK_IN_REASON)),
            })
            .await
    }

    /// Record an outbound movement and decrease stock. No price is carried.
    pub async fn stock_out(
        &self,
        product_id: &str,
        quantity: i64,
        reason: Option<String>,
    ) -> Result<Movement> {
        validate_id(product_id, "product")?;
        validate_quantity(quantity)?;

        info!(product_id = %product_id, quantity, "stock out");

        self.movements
            .create(NewMovement {
                product_id: product_id.to_string(),
                kind: MovementKind::Out,
                quantity,
                unit_price: None,
                total_amount: None,
                reason: Some(normalize_reason(reason, DEFAULT_STOCK_OUT_REASON)),
            })
            .await
    }

    /// Record a signed stock adjustment. The quantity carries its own sign
    /// and a reason is mandatory.
    pub async fn adjust_stock(
        &self,
        product_id: &str,
        quantity: i64,
        reason: &str,
    ) -> Result<Movement> {
        validate_id(product_id, "product")?;
        if quantity == 0 {
            return Err(Error::validation("adjustment quantity must not be zero"));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::validation("adjustment reason must not be empty"));
        }

        info!(product_id = %product_id, quantity, reason = %reason, "stock adjust");

        self.movements
            .create(NewMovement {
                product_id: product_id.to_string(),
                kind: MovementKind::Adjust,
                quantity,
                unit_price: None,
                total_amount: None,
                reason: Some(reason.to_string()),
            })
            .await
    }

    /// Remove a ledger entry. The entry's stock effect is not reversed.
    pub async fn delete_movement(&self, id: &str) -> Result<()> {
        validate_id(id, "transaction")?;
        let deleted = self.movements.delete(id).await?;
        if !deleted {
            return Err(Error::not_found("transaction", id));
        }
        Ok(())
    }
}

fn normalize_reason(reason: Option<String>, default: &str) -> String {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| default.to_string())
}
