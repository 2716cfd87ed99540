//! SQLite implementation of SalesStore.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, Utc};
use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SimpleExpr, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{MovementKind, NewSale, Page, PageRequest, Sale, SalesStats};
use crate::errors::{Error, Result};
use crate::interfaces::SalesStore;
use crate::storage::schema::{InventoryTransactions, Products, SalesRecords};

use super::{parse_timestamp, select_product_name, select_stock};

/// Reason recorded on the mirrored movement of every sale.
pub const SALE_REASON: &str = "sale";

/// SQLite implementation of SalesStore.
pub struct SqliteSalesStore {
    pool: SqlitePool,
}

impl SqliteSalesStore {
    /// Create a new SQLite sales store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count_where(&self, condition: Option<SimpleExpr>) -> Result<u64> {
        let mut stmt = Query::select();
        stmt.expr(Func::count(Expr::col(Asterisk)))
            .from(SalesRecords::Table);
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let total: i64 = row.get(0);
        Ok(total as u64)
    }

    /// Paged sales read with the product name joined on for enrichment.
    async fn page_where(
        &self,
        condition: Option<SimpleExpr>,
        page: PageRequest,
    ) -> Result<Page<Sale>> {
        let total = self.count_where(condition.clone()).await?;

        let mut stmt = Query::select();
        stmt.column((SalesRecords::Table, Asterisk))
            .expr_as(
                Expr::col((Products::Table, Products::Name)),
                Alias::new("product_name"),
            )
            .from(SalesRecords::Table)
            .inner_join(
                Products::Table,
                Expr::col((SalesRecords::Table, SalesRecords::ProductId))
                    .equals((Products::Table, Products::Id)),
            )
            .order_by((SalesRecords::Table, SalesRecords::CreatedAt), Order::Desc)
            .limit(u64::from(page.limit))
            .offset(page.offset());
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in &rows {
            sales.push(sale_from_row(row)?);
        }

        Ok(Page::new(sales, total, page))
    }

    async fn count_and_revenue(&self, condition: Option<SimpleExpr>) -> Result<(u64, f64)> {
        let mut stmt = Query::select();
        stmt.expr_as(Func::count(Expr::col(Asterisk)), Alias::new("sales_count"))
            .expr_as(
                Func::coalesce([
                    Func::sum(Expr::col(SalesRecords::TotalAmount)).into(),
                    Expr::val(0.0).into(),
                ]),
                Alias::new("revenue"),
            )
            .from(SalesRecords::Table);
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let count: i64 = row.get("sales_count");
        let revenue: f64 = row.get("revenue");
        Ok((count as u64, revenue))
    }
}

#[async_trait]
impl SalesStore for SqliteSalesStore {
    async fn create(&self, new: NewSale) -> Result<Sale> {
        let sale_id = Uuid::new_v4().to_string();
        let movement_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        // Stock check, sale row, decrement and mirrored ledger row form one
        // atomic unit; the check shares the transaction with the decrement
        // so a concurrent sale cannot race past it.
        let mut tx = self.pool.begin().await?;

        let stock = select_stock(&mut *tx, &new.product_id)
            .await?
            .ok_or_else(|| Error::not_found("product", new.product_id.clone()))?;
        if stock < new.quantity {
            return Err(Error::InsufficientStock {
                available: stock,
                requested: new.quantity,
            });
        }

        let insert_sale = Query::insert()
            .into_table(SalesRecords::Table)
            .columns([
                SalesRecords::Id,
                SalesRecords::ProductId,
                SalesRecords::Quantity,
                SalesRecords::UnitPrice,
                SalesRecords::TotalAmount,
                SalesRecords::CreatedAt,
            ])
            .values_panic([
                sale_id.clone().into(),
                new.product_id.clone().into(),
                new.quantity.into(),
                new.unit_price.into(),
                new.total_amount.into(),
                created_at.to_rfc3339().into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&insert_sale).execute(&mut *tx).await?;

        // The one and only stock touch for this sale.
        let decrement = Query::update()
            .table(Products::Table)
            .value(Products::Stock, Expr::col(Products::Stock).sub(new.quantity))
            .and_where(Expr::col(Products::Id).eq(new.product_id.as_str()))
            .to_string(SqliteQueryBuilder);

        sqlx::query(&decrement).execute(&mut *tx).await?;

        // Mirror the sale into the movement ledger. Historical record only;
        // it must not decrement stock a second time, so the generic
        // movement create path is deliberately not reused here.
        let insert_movement = Query::insert()
            .into_table(InventoryTransactions::Table)
            .columns([
                InventoryTransactions::Id,
                InventoryTransactions::ProductId,
                InventoryTransactions::Type,
                InventoryTransactions::Quantity,
                InventoryTransactions::UnitPrice,
                InventoryTransactions::TotalAmount,
                InventoryTransactions::Reason,
                InventoryTransactions::CreatedAt,
            ])
            .values_panic([
                movement_id.into(),
                new.product_id.clone().into(),
                MovementKind::Out.as_str().into(),
                new.quantity.into(),
                new.unit_price.into(),
                new.total_amount.into(),
                SALE_REASON.into(),
                created_at.to_rfc3339().into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&insert_movement).execute(&mut *tx).await?;

        tx.commit().await?;

        // Read-side enrichment, separate from the committed unit.
        let product_name = select_product_name(&self.pool, &new.product_id).await?;

        Ok(Sale {
            id: sale_id,
            product_id: new.product_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_amount: new.total_amount,
            product_name,
            created_at,
        })
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Sale>> {
        self.page_where(None, page).await
    }

    async fn find_by_product(&self, product_id: &str, page: PageRequest) -> Result<Page<Sale>> {
        let condition = Expr::col((SalesRecords::Table, SalesRecords::ProductId)).eq(product_id);
        self.page_where(Some(condition), page).await
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Sale>> {
        let condition = Expr::col((SalesRecords::Table, SalesRecords::CreatedAt))
            .gte(start.to_rfc3339())
            .and(Expr::col((SalesRecords::Table, SalesRecords::CreatedAt)).lte(end.to_rfc3339()));
        self.page_where(Some(condition), page).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let query = Query::delete()
            .from_table(SalesRecords::Table)
            .and_where(Expr::col(SalesRecords::Id).eq(id))
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&query).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<SalesStats> {
        let (total_sales, total_revenue) = self.count_and_revenue(None).await?;

        let (today_start, today_end) = local_day_bounds();
        let condition = Expr::col(SalesRecords::CreatedAt)
            .gte(today_start.to_rfc3339())
            .and(Expr::col(SalesRecords::CreatedAt).lt(today_end.to_rfc3339()));
        let (today_sales, today_revenue) = self.count_and_revenue(Some(condition)).await?;

        Ok(SalesStats {
            total_sales,
            total_revenue,
            today_sales,
            today_revenue,
        })
    }
}

/// Today's local-time day as UTC bounds: [local midnight, next local midnight).
fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Local::now();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = match midnight.and_local_timezone(Local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // Midnight skipped by a DST transition; the day effectively starts now.
        LocalResult::None => now,
    }
    .with_timezone(&Utc);
    (start, start + Duration::days(1))
}

fn sale_from_row(row: &SqliteRow) -> Result<Sale> {
    let created_raw: String = row.get("created_at");

    Ok(Sale {
        id: row.get("id"),
        product_id: row.get("product_id"),
        quantity: row.get("quantity"),
        unit_price: row.get("unit_price"),
        total_amount: row.get("total_amount"),
        product_name: row.get("product_name"),
        created_at: parse_timestamp("created_at", &created_raw)?,
    })
}
