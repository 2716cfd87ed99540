//! Domain services: input validation and orchestration over the stores.
//!
//! Validation failures are reported before any store call; no partial write
//! ever originates from a rejected input.

mod inventory;
mod product;
mod sales;

pub use inventory::InventoryService;
pub use product::ProductService;
pub use sales::SalesService;

use crate::domain::PageRequest;
use crate::errors::{Error, Result};

/// Reject out-of-range pagination before any store call.
pub(crate) fn validate_page(page: PageRequest) -> Result<()> {
    if page.page < 1 {
        return Err(Error::validation("page must be at least 1"));
    }
    if page.limit < 1 || page.limit > PageRequest::MAX_LIMIT {
        return Err(Error::validation("limit must be between 1 and 100"));
    }
    Ok(())
}

/// Reject blank identifiers before any store call.
pub(crate) fn validate_id(id: &str, entity: &'static str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::Validation(format!("{entity} id must not be empty")));
    }
    Ok(())
}

/// Quantities on the write paths are strictly positive integers.
pub(crate) fn validate_quantity(quantity: i64) -> Result<()> {
    if quantity <= 0 {
        return Err(Error::validation("quantity must be a positive integer"));
    }
    Ok(())
}
