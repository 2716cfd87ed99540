//! SQLite implementation of ProductStore.

use async_trait::async_trait;
use chrono::Utc;
use sea_query::{Asterisk, Expr, Func, Order, Query, SimpleExpr, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{NewProduct, Page, PageRequest, Product, ProductCategory, ProductPatch};
use crate::errors::{Error, Result};
use crate::interfaces::ProductStore;
use crate::storage::schema::Products;

use super::parse_timestamp;

/// SQLite implementation of ProductStore.
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Create a new SQLite product store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count_where(&self, condition: Option<SimpleExpr>) -> Result<u64> {
        let mut stmt = Query::select();
        stmt.expr(Func::count(Expr::col(Asterisk)))
            .from(Products::Table);
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let total: i64 = row.get(0);
        Ok(total as u64)
    }

    async fn page_where(
        &self,
        condition: Option<SimpleExpr>,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let total = self.count_where(condition.clone()).await?;

        let mut stmt = Query::select();
        stmt.column(Asterisk)
            .from(Products::Table)
            .order_by(Products::CreatedAt, Order::Desc)
            .limit(u64::from(page.limit))
            .offset(page.offset());
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            products.push(product_from_row(row)?);
        }

        Ok(Page::new(products, total, page))
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn find_all(&self, page: PageRequest) -> Result<Page<Product>> {
        self.page_where(None, page).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let query = Query::select()
            .column(Asterisk)
            .from(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_optional(&self.pool).await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn find_by_category(
        &self,
        category: ProductCategory,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let condition = Expr::col(Products::Category).eq(category.as_str());
        self.page_where(Some(condition), page).await
    }

    async fn find_low_stock(&self) -> Result<Vec<Product>> {
        let query = Query::select()
            .column(Asterisk)
            .from(Products::Table)
            .and_where(Expr::col(Products::Stock).lte(Expr::col(Products::MinStock)))
            .order_by(Products::Stock, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            products.push(product_from_row(row)?);
        }

        Ok(products)
    }

    async fn search(&self, keyword: &str, page: PageRequest) -> Result<Page<Product>> {
        let pattern = format!("%{}%", keyword);
        let condition = Expr::col(Products::Name)
            .like(pattern.as_str())
            .or(Expr::col(Products::Description).like(pattern.as_str()));
        self.page_where(Some(condition), page).await
    }

    async fn create(&self, new: NewProduct) -> Result<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let query = Query::insert()
            .into_table(Products::Table)
            .columns([
                Products::Id,
                Products::Name,
                Products::Category,
                Products::Description,
                Products::Unit,
                Products::Price,
                Products::Cost,
                Products::Stock,
                Products::MinStock,
                Products::CreatedAt,
                Products::UpdatedAt,
            ])
            .values_panic([
                id.clone().into(),
                new.name.into(),
                new.category.as_str().into(),
                new.description.into(),
                new.unit.into(),
                new.price.into(),
                new.cost.into(),
                new.stock.into(),
                new.min_stock.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&self.pool).await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| Error::not_found("product", id))
    }

    async fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut stmt = Query::update();
        stmt.table(Products::Table);
        if let Some(name) = patch.name {
            stmt.value(Products::Name, name);
        }
        if let Some(category) = patch.category {
            stmt.value(Products::Category, category.as_str());
        }
        if let Some(description) = patch.description {
            stmt.value(Products::Description, description);
        }
        if let Some(unit) = patch.unit {
            stmt.value(Products::Unit, unit);
        }
        if let Some(price) = patch.price {
            stmt.value(Products::Price, price);
        }
        if let Some(cost) = patch.cost {
            stmt.value(Products::Cost, cost);
        }
        if let Some(min_stock) = patch.min_stock {
            stmt.value(Products::MinStock, min_stock);
        }
        stmt.value(Products::UpdatedAt, Utc::now().to_rfc3339());
        stmt.and_where(Expr::col(Products::Id).eq(id));
        let query = stmt.to_string(SqliteQueryBuilder);

        let result = sqlx::query(&query).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let query = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&query).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply_stock_delta(&self, id: &str, delta: i64) -> Result<bool> {
        let query = Query::update()
            .table(Products::Table)
            .value(Products::Stock, Expr::col(Products::Stock).add(delta))
            .and_where(Expr::col(Products::Id).eq(id))
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&query).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product> {
    let category_raw: String = row.get("category");
    let category = ProductCategory::parse(&category_raw).ok_or(Error::Corrupted {
        column: "category",
        value: category_raw,
    })?;

    let created_raw: String = row.get("created_at");
    let updated_raw: String = row.get("updated_at");

    Ok(Product {
        id: row.get("id"),
        name: row.get("name"),
        category,
        description: row.get("description"),
        unit: row.get("unit"),
        price: row.get("price"),
        cost: row.get("cost"),
        stock: row.get("stock"),
        min_stock: row.get("min_stock"),
        created_at: parse_timestamp("created_at", &created_raw)?,
        updated_at: parse_timestamp("updated_at", &updated_raw)?,
    })
}
