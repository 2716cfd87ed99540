//! Product catalog service.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    NewProduct, Page, PageRequest, Product, ProductCategory, ProductPatch, ProductStats,
};
use crate::errors::{Error, Result};
use crate::interfaces::ProductStore;

use super::{validate_id, validate_page};

/// CRUD, search and reporting over the product catalog.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Product>> {
        validate_page(page)?;
        self.products.find_all(page).await
    }

    pub async fn get(&self, id: &str) -> Result<Product> {
        validate_id(id, "product")?;
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("product", id))
    }

    pub async fn list_by_category(
        &self,
        category: ProductCategory,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        validate_page(page)?;
        self.products.find_by_category(category, page).await
    }

    pub async fn low_stock(&self) -> Result<Vec<Product>> {
        self.products.find_low_stock().await
    }

    pub async fn search(&self, keyword: &str, page: PageRequest) -> Result<Page<Product>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(Error::validation("search keyword must not be empty"));
        }
        validate_page(page)?;
        self.products.search(keyword, page).await
    }

    pub async fn create(&self, new: NewProduct) -> Result<Product> {
        validate_product(&new)?;
        info!(name = %new.name, category = %new.category, "creating product");
        self.products.create(new).await
    }

    /// Apply a partial update to a product's mutable fields. Stock is not
    /// patchable; it only moves through the ledger.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        validate_id(id, "product")?;
        if patch.is_empty() {
            return Err(Error::validation("update payload must not be empty"));
        }
        validate_patch(&patch)?;
        self.products
            .update(id, patch)
            .await?
            .ok_or_else(|| Error::not_found("product", id))
    }

    /// Delete a product; its ledger history goes with it (store cascade).
    pub async fn delete(&self, id: &str) -> Result<()> {
        validate_id(id, "product")?;
        let deleted = self.products.delete(id).await?;
        if !deleted {
            return Err(Error::not_found("product", id));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Catalog aggregates. Pulls the full unpaged product set once; fine at
    /// shop scale, a store-side aggregate if the catalog ever grows.
    pub async fn stats(&self) -> Result<ProductStats> {
        let all = self
            .products
            .find_all(PageRequest::new(1, u32::MAX))
            .await?;
        let low_stock = self.products.find_low_stock().await?;

        let total_value = all
            .data
            .iter()
            .map(|p| p.stock as f64 * p.cost)
            .sum();

        Ok(ProductStats {
            total_products: all.total,
            low_stock_products: low_stock.len() as u64,
            total_value,
        })
    }
}

fn validate_product(new: &NewProduct) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(Error::validation("product name must not be empty"));
    }
    if new.unit.trim().is_empty() {
        return Err(Error::validation("product unit must not be empty"));
    }
    if new.price < 0.0 {
        return Err(Error::validation("price must not be negative"));
    }
    if new.cost < 0.0 {
        return Err(Error::validation("cost must not be negative"));
    }
    if new.stock < 0 {
        return Err(Error::validation("stock must not be negative"));
    }
    if new.min_stock < 0 {
        return Err(Error::validation("minimum stock must not be negative"));
    }
    Ok(())
}

fn validate_patch(patch: &ProductPatch) -> Result<()> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(Error::validation("product name must not be empty"));
    }
    if patch.unit.as_deref().is_some_and(|u| u.trim().is_empty()) {
        return Err(Error::validation("product unit must not be empty"));
    }
    if patch.price.is_some_and(|p| p < 0.0) {
        return Err(Error::validation("price must not be negative"));
    }
    if patch.cost.is_some_and(|c| c < 0.0) {
        return Err(Error::validation("cost must not be negative"));
    }
    if patch.min_stock.is_some_and(|m| m < 0) {
        return Err(Error::validation("minimum stock must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockProductStore;

    fn sample(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: ProductCategory::Pen,
            description: Some("smooth rollerball".to_string()),
            unit: "piece".to_string(),
            price: 3.5,
            cost: 1.2,
            stock: 10,
            min_stock: 5,
        }
    }

    fn service() -> (ProductService, Arc<MockProductStore>) {
        let store = Arc::new(MockProductStore::new());
        (ProductService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn get_missing_product_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.get("missing").await,
            Err(Error::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields() {
        let (service, _) = service();

        let mut bad = sample("");
        assert!(matches!(
            service.create(bad.clone()).await,
            Err(Error::Validation(_))
        ));

        bad = sample("Pen");
        bad.price = -1.0;
        assert!(matches!(
            service.create(bad).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_with_empty_patch_is_rejected() {
        let (service, _) = service();
        let created = service.create(sample("Pen")).await.unwrap();

        assert!(matches!(
            service.update(&created.id, ProductPatch::default()).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() {
        let (service, _) = service();
        let created = service.create(sample("Pen")).await.unwrap();

        let updated = service
            .update(
                &created.id,
                ProductPatch {
                    price: Some(4.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 4.0);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.stock, created.stock);
    }

    #[tokio::test]
    async fn pagination_bounds_are_enforced() {
        let (service, _) = service();
        assert!(matches!(
            service.list(PageRequest::new(0, 10)).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.list(PageRequest::new(1, 101)).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn blank_search_keyword_is_rejected() {
        let (service, _) = service();
        assert!(matches!(
            service.search("   ", PageRequest::default()).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn stats_sum_value_at_cost() {
        let (service, _) = service();
        service.create(sample("Pen A")).await.unwrap();
        let mut other = sample("Pen B");
        other.stock = 2;
        other.cost = 10.0;
        service.create(other).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_products, 2);
        // 10 * 1.2 + 2 * 10.0
        assert!((stats.total_value - 32.0).abs() < 1e-9);
    }
}
