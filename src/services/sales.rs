//! Sales service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{NewSale, Page, PageRequest, Sale, SalesStats};
use crate::errors::{Error, Result};
use crate::interfaces::SalesStore;

use super::{validate_id, validate_page, validate_quantity};

/// Sale recording and reporting over the sales ledger.
#[derive(Clone)]
pub struct SalesService {
    sales: Arc<dyn SalesStore>,
}

impl SalesService {
    pub fn new(sales: Arc<dyn SalesStore>) -> Self {
        Self { sales }
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Sale>> {
        validate_page(page)?;
        self.sales.find_all(page).await
    }

    pub async fn list_by_product(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Sale>> {
        validate_id(product_id, "product")?;
        validate_page(page)?;
        self.sales.find_by_product(product_id, page).await
    }

    pub async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Sale>> {
        if start >= end {
            return Err(Error::validation("start date must be before end date"));
        }
        validate_page(page)?;
        self.sales.find_by_date_range(start, end, page).await
    }

    /// Record a sale. The store checks available stock, decrements it and
    /// mirrors the sale into the movement ledger in one atomic unit.
    pub async fn create_sale(
        &self,
        product_id: &str,
        quantity: i64,
        unit_price: f64,
    ) -> Result<Sale> {
        validate_id(product_id, "product")?;
        validate_quantity(quantity)?;
        if unit_price <= 0.0 {
            return Err(Error::validation("unit price must be greater than zero"));
        }

        info!(product_id = %product_id, quantity, unit_price, "recording sale");

        self.sales
            .create(NewSale {
                product_id: product_id.to_string(),
                quantity,
                unit_price,
                total_amount: quantity as f64 * unit_price,
            })
            .await
    }

    /// Remove a sales row. History only: stock is not restored and the
    /// mirrored movement stays.
    pub async fn delete_sale(&self, id: &str) -> Result<()> {
        validate_id(id, "sale")?;
        let deleted = self.sales.delete(id).await?;
        if !deleted {
            return Err(Error::not_found("sale", id));
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<SalesStats> {
        self.sales.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockSalesStore;

    fn service() -> (SalesService, Arc<MockSalesStore>) {
        let store = Arc::new(MockSalesStore::new());
        (SalesService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn create_sale_computes_total_amount() {
        let (service, store) = service();
        store.set_stock("p1", 10).await;

        let sale = service.create_sale("p1", 3, 4.0).await.unwrap();

        assert_eq!(sale.quantity, 3);
        assert!((sale.total_amount - 12.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn create_sale_rejects_bad_input_before_any_store_call() {
        let (service, store) = service();
        store.set_stock("p1", 10).await;

        assert!(matches!(
            service.create_sale("", 3, 4.0).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.create_sale("p1", 0, 4.0).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.create_sale("p1", 3, 0.0).await,
            Err(Error::Validation(_))
        ));
        assert!(store.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn insufficient_stock_propagates() {
        let (service, store) = service();
        store.set_stock("p1", 2).await;

        assert!(matches!(
            service.create_sale("p1", 3, 4.0).await,
            Err(Error::InsufficientStock {
                available: 2,
                requested: 3
            })
        ));
    }

    #[tokio::test]
    async fn date_range_must_be_ordered() {
        let (service, _) = service();
        let start = Utc::now();
        let end = start - chrono::Duration::days(1);

        assert!(matches!(
            service
                .list_by_date_range(start, end, PageRequest::default())
                .await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn delete_missing_sale_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.delete_sale("nope").await,
            Err(Error::NotFound { .. })
        ));
    }
}
