//! SQLite implementation of MovementStore.

use async_trait::async_trait;
use chrono::Utc;
use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SimpleExpr, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Movement, MovementKind, NewMovement, Page, PageRequest};
use crate::errors::{Error, Result};
use crate::interfaces::MovementStore;
use crate::storage::schema::{InventoryTransactions, Products};

use super::{parse_timestamp, select_product_name, select_stock};

/// SQLite implementation of MovementStore.
pub struct SqliteMovementStore {
    pool: SqlitePool,
}

impl SqliteMovementStore {
    /// Create a new SQLite movement store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count_where(&self, condition: Option<SimpleExpr>) -> Result<u64> {
        let mut stmt = Query::select();
        stmt.expr(Func::count(Expr::col(Asterisk)))
            .from(InventoryTransactions::Table);
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let total: i64 = row.get(0);
        Ok(total as u64)
    }

    /// Paged ledger read with the product name joined on for enrichment.
    async fn page_where(
        &self,
        condition: Option<SimpleExpr>,
        page: PageRequest,
    ) -> Result<Page<Movement>> {
        let total = self.count_where(condition.clone()).await?;

        let mut stmt = Query::select();
        stmt.column((InventoryTransactions::Table, Asterisk))
            .expr_as(
                Expr::col((Products::Table, Products::Name)),
                Alias::new("product_name"),
            )
            .from(InventoryTransactions::Table)
            .inner_join(
                Products::Table,
                Expr::col((InventoryTransactions::Table, InventoryTransactions::ProductId))
                    .equals((Products::Table, Products::Id)),
            )
            .order_by(
                (InventoryTransactions::Table, InventoryTransactions::CreatedAt),
                Order::Desc,
            )
            .limit(u64::from(page.limit))
            .offset(page.offset());
        if let Some(condition) = condition {
            stmt.and_where(condition);
        }
        let query = stmt.to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut movements = Vec::with_capacity(rows.len());
        for row in &rows {
            movements.push(movement_from_row(row)?);
        }

        Ok(Page::new(movements, total, page))
    }
}

#[async_trait]
impl MovementStore for SqliteMovementStore {
    async fn create(&self, new: NewMovement) -> Result<Movement> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let delta = new.kind.stock_delta(new.quantity);

        // The ledger row and the stock change commit together or not at
        // all. A failure at any step rolls the whole unit back.
        let mut tx = self.pool.begin().await?;

        let insert = Query::insert()
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
                id.clone().into(),
                new.product_id.clone().into(),
                new.kind.as_str().into(),
                new.quantity.into(),
                new.unit_price.into(),
                new.total_amount.into(),
                new.reason.clone().into(),
                created_at.to_rfc3339().into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&insert).execute(&mut *tx).await?;

        // An outbound or negative-adjust movement must not take stock below
        // zero. The check shares the write transaction with the decrement.
        if delta < 0 {
            let stock = select_stock(&mut *tx, &new.product_id)
                .await?
                .ok_or_else(|| Error::not_found("product", new.product_id.clone()))?;
            if stock + delta < 0 {
                return Err(Error::InsufficientStock {
                    available: stock,
                    requested: -delta,
                });
            }
        }

        let update = Query::update()
            .table(Products::Table)
            .value(Products::Stock, Expr::col(Products::Stock).add(delta))
            .and_where(Expr::col(Products::Id).eq(new.product_id.as_str()))
            .to_string(SqliteQueryBuilder);

        let updated = sqlx::query(&update).execute(&mut *tx).await?;
        if updated.rows_affected() == 0 {
            return Err(Error::not_found("product", new.product_id.clone()));
        }

        tx.commit().await?;

        // Read-side enrichment, separate from the committed unit.
        let product_name = select_product_name(&self.pool, &new.product_id).await?;

        Ok(Movement {
            id,
            product_id: new.product_id,
            kind: new.kind,
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_amount: new.total_amount,
            reason: new.reason,
            product_name,
            created_at,
        })
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Movement>> {
        self.page_where(None, page).await
    }

    async fn find_by_product(
        &self,
        product_id: &str,
        page: PageRequest,
    ) -> Result<Page<Movement>> {
        let condition =
            Expr::col((InventoryTransactions::Table, InventoryTransactions::ProductId))
                .eq(product_id);
        self.page_where(Some(condition), page).await
    }

    async fn find_by_kind(&self, kind: MovementKind, page: PageRequest) -> Result<Page<Movement>> {
        let condition = Expr::col((InventoryTransactions::Table, InventoryTransactions::Type))
            .eq(kind.as_str());
        self.page_where(Some(condition), page).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let query = Query::delete()
            .from_table(InventoryTransactions::Table)
            .and_where(Expr::col(InventoryTransactions::Id).eq(id))
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&query).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

pub(super) fn movement_from_row(row: &SqliteRow) -> Result<Movement> {
    let kind_raw: String = row.get("type");
    let kind = MovementKind::parse(&kind_raw).ok_or(Error::Corrupted {
        column: "type",
        value: kind_raw,
    })?;

    let created_raw: String = row.get("created_at");

    Ok(Movement {
        id: row.get("id"),
        product_id: row.get("product_id"),
        kind,
        quantity: row.get("quantity"),
        unit_price: row.get("unit_price"),
        total_amount: row.get("total_amount"),
        reason: row.get("reason"),
        product_name: row.get("product_name"),
        created_at: parse_timestamp("created_at", &created_raw)?,
    })
}
