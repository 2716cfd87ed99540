//! Product persistence interface.

use async_trait::async_trait;

use crate::domain::{NewProduct, Page, PageRequest, Product, ProductCategory, ProductPatch};
use crate::errors::Result;

/// CRUD and query access to the product table.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest first.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Product>>;

    /// A single product, `None` when absent.
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// Products in one category, newest first.
    async fn find_by_category(
        &self,
        category: ProductCategory,
        page: PageRequest,
    ) -> Result<Page<Product>>;

    /// Products at or below their minimum stock, lowest stock first. Unpaged.
    async fn find_low_stock(&self) -> Result<Vec<Product>>;

    /// Case-insensitive substring search over name and description.
    async fn search(&self, keyword: &str, page: PageRequest) -> Result<Page<Product>>;

    /// Insert a product and return the stored row.
    async fn create(&self, new: NewProduct) -> Result<Product>;

    /// Apply a partial update. An empty patch is a no-op that returns the
    /// current row; `None` when the product does not exist.
    async fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>>;

    /// Remove a product (the store cascades to its ledger rows). Returns
    /// whether a row was actually removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Raw atomic stock increment, pushed into the store as
    /// `stock = stock + delta`. Returns whether the product row exists.
    /// Stock moves through the ledger write paths; this is the primitive
    /// they build on.
    async fn apply_stock_delta(&self, id: &str, delta: i64) -> Result<bool>;
}
