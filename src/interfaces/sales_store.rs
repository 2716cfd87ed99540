//! Sales ledger persistence interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewSale, Page, PageRequest, Sale, SalesStats};
use crate::errors::Result;

/// Append-only creation and query access to sales records.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Record a sale: checks available stock, decrements it, and appends a
    /// mirrored outbound movement, all in one transaction. Fails with
    /// `InsufficientStock` when stock is short and `NotFound` when the
    /// product does not exist; either failure leaves no writes behind.
    async fn create(&self, new: NewSale) -> Result<Sale>;

    /// All sales, newest first.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Sale>>;

    /// Sales of one product, newest first.
    async fn find_by_product(&self, product_id: &str, page: PageRequest) -> Result<Page<Sale>>;

    /// Sales within an inclusive time range, newest first.
    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Sale>>;

    /// Remove a sales row. History only: stock is not restored and the
    /// mirrored movement stays. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Lifetime and today's (local midnight to next midnight) count and
    /// revenue, computed by aggregate queries.
    async fn stats(&self) -> Result<SalesStats>;
}
