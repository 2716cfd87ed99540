//! Mock store implementations for testing.
//!
//! Recorders with failure toggles; service tests use them to check that
//! validation rejects input before any store call and that store failures
//! propagate untranslated.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Movement, MovementKind, NewMovement, NewProduct, NewSale, Page, PageRequest, Product,
    ProductCategory, ProductPatch, Sale, SalesStats,
};
use crate::errors::{Error, Result};
use crate::interfaces::{MovementStore, ProductStore, SalesStore};

fn store_failure() -> Error {
    Error::Database(sqlx::Error::PoolClosed)
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let data = items
        .iter()
        .rev()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect();
    Page::new(data, items.len() as u64, page)
}

/// Mock product store over an in-memory map.
#[derive(Default)]
pub struct MockProductStore {
    products: RwLock<Vec<Product>>,
    fail: RwLock<bool>,
}

impl MockProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Seed a product directly, bypassing create-side defaults.
    pub async fn insert(&self, product: Product) {
        self.products.write().await.push(product);
    }

    async fn check_fail(&self) -> Result<()> {
        if *self.fail.read().await {
            return Err(store_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MockProductStore {
    async fn find_all(&self, page: PageRequest) -> Result<Page<Product>> {
        self.check_fail().await?;
        let products = self.products.read().await;
        Ok(page_of(&products, page))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        self.check_fail().await?;
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_category(
        &self,
        category: ProductCategory,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        self.check_fail().await?;
        let products = self.products.read().await;
        let matching: Vec<Product> = products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn find_low_stock(&self) -> Result<Vec<Product>> {
        self.check_fail().await?;
        let products = self.products.read().await;
        let mut low: Vec<Product> = products
            .iter()
            .filter(|p| p.stock <= p.min_stock)
            .cloned()
            .collect();
        low.sort_by_key(|p| p.stock);
        Ok(low)
    }

    async fn search(&self, keyword: &str, page: PageRequest) -> Result<Page<Product>> {
        self.check_fail().await?;
        let keyword = keyword.to_lowercase();
        let products = self.products.read().await;
        let matching: Vec<Product> = products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&keyword)
                    || p.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&keyword))
            })
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn create(&self, new: NewProduct) -> Result<Product> {
        self.check_fail().await?;
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            category: new.category,
            description: new.description,
            unit: new.unit,
            price: new.price,
            cost: new.cost,
            stock: new.stock,
            min_stock: new.min_stock,
            created_at: now,
            updated_at: now,
        };
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>> {
        self.check_fail().await?;
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(unit) = patch.unit {
            product.unit = unit;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(cost) = patch.cost {
            product.cost = cost;
        }
        if let Some(min_stock) = patch.min_stock {
            product.min_stock = min_stock;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.check_fail().await?;
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn apply_stock_delta(&self, id: &str, delta: i64) -> Result<bool> {
        self.check_fail().await?;
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.stock += delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Mock movement store recording created entries.
#[derive(Default)]
pub struct MockMovementStore {
    movements: RwLock<Vec<Movement>>,
    fail_on_create: RwLock<bool>,
}

impl MockMovementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_create(&self, fail: bool) {
        *self.fail_on_create.write().await = fail;
    }

    /// Every movement recorded so far, oldest first.
    pub async fn recorded(&self) -> Vec<Movement> {
        self.movements.read().await.clone()
    }
}

#[async_trait]
impl MovementStore for MockMovementStore {
    async fn create(&self, new: NewMovement) -> Result<Movement> {
        if *self.fail_on_create.read().await {
            return Err(store_failure());
        }
        let movement = Movement {
            id: Uuid::new_v4().to_string(),
            product_id: new.product_id,
            kind: new.kind,
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_amount: new.total_amount,
            reason: new.reason,
            product_name: None,
            created_at: Utc::now(),
        };
        self.movements.write().await.push(movement.clone());
        Ok(movement)
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Movement>> {
        let movements = self.movements.read().await;
        Ok(page_of(&movements, page))
    }

    async fn find_by_product(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Movement>> {
        let movements = self.movements.read().await;
        let matching: Vec<Movement> = movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn find_by_kind(&self, kind: MovementKind, page: PageRequest) -> Result<Page<Movement>> {
        let movements = self.movements.read().await;
        let matching: Vec<Movement> =
            movements.iter().filter(|m| m.kind == kind).cloned().collect();
        Ok(page_of(&matching, page))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut movements = self.movements.write().await;
        let before = movements.len();
        movements.retain(|m| m.id != id);
        Ok(movements.len() < before)
    }
}

/// Mock sales store recording created sales against a configurable stock map.
#[derive(Default)]
pub struct MockSalesStore {
    sales: RwLock<Vec<Sale>>,
    stock: RwLock<HashMap<String, i64>>,
    fail_on_create: RwLock<bool>,
}

impl MockSalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_create(&self, fail: bool) {
        *self.fail_on_create.write().await = fail;
    }

    /// Register a product id with its available stock.
    pub async fn set_stock(&self, product_id: &str, stock: i64) {
        self.stock
            .write()
            .await
            .insert(product_id.to_string(), stock);
    }

    pub async fn recorded(&self) -> Vec<Sale> {
        self.sales.read().await.clone()
    }
}

#[async_trait]
impl SalesStore for MockSalesStore {
    async fn create(&self, new: NewSale) -> Result<Sale> {
        if *self.fail_on_create.read().await {
            return Err(store_failure());
        }
        let mut stock = self.stock.write().await;
        let available = *stock
            .get(&new.product_id)
            .ok_or_else(|| Error::not_found("product", new.product_id.clone()))?;
        if available < new.quantity {
            return Err(Error::InsufficientStock {
                available,
                requested: new.quantity,
            });
        }
        stock.insert(new.product_id.clone(), available - new.quantity);

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: new.product_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_amount: new.total_amount,
            product_name: None,
            created_at: Utc::now(),
        };
        self.sales.write().await.push(sale.clone());
        Ok(sale)
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Sale>> {
        let sales = self.sales.read().await;
        Ok(page_of(&sales, page))
    }

    async fn find_by_product(&self, product_id: &str, page: PageRequest) -> Result<Page<Sale>> {
        let sales = self.sales.read().await;
        let matching: Vec<Sale> = sales
            .iter()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Sale>> {
        let sales = self.sales.read().await;
        let matching: Vec<Sale> = sales
            .iter()
            .filter(|s| s.created_at >= start && s.created_at <= end)
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut sales = self.sales.write().await;
        let before = sales.len();
        sales.retain(|s| s.id != id);
        Ok(sales.len() < before)
    }

    async fn stats(&self) -> Result<SalesStats> {
        let sales = self.sales.read().await;
        let total_sales = sales.len() as u64;
        let total_revenue = sales.iter().map(|s| s.total_amount).sum();
        Ok(SalesStats {
            total_sales,
            total_revenue,
            today_sales: total_sales,
            today_revenue: total_revenue,
        })
    }
}
