//! SQLite implementations of the persistence interfaces.

mod movement_store;
mod product_store;
mod sales_store;


pub use movement_store::SqliteMovementStore;
pub use product_store::SqliteProductStore;
pub use sales_store::SqliteSalesStore;

use chrono::{DateTime, Utc};
use sea_query::{Expr, Query, SqliteQueryBuilder};
use sqlx::{Row, Sqlite};

use crate::errors::{Error, Result};

use super::schema::Products;

/// Decode an RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::Corrupted {
            column,
            value: value.to_string(),
        })
}

/// Current stock for a product, `None` when the row is absent. Run against
/// the write transaction when the answer gates a write.
pub(crate) async fn select_stock<'e, E>(executor: E, product_id: &str) -> Result<Option<i64>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let query = Query::select()
        .column(Products::Stock)
        .from(Products::Table)
        .and_where(Expr::col(Products::Id).eq(product_id))
        .to_string(SqliteQueryBuilder);

    let row = sqlx::query(&query).fetch_optional(executor).await?;
    Ok(row.map(|r| r.get("stock")))
}

/// Product name lookup for read-side enrichment of ledger rows. Never part
/// of a write transaction.
pub(crate) async fn select_product_name<'e, E>(
    executor: E,
    product_id: &str,
) -> Result<Option<String>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let query = Query::select()
        .column(Products::Name)
        .from(Products::Table)
        .and_where(Expr::col(Products::Id).eq(product_id))
        .to_string(SqliteQueryBuilder);

    let row = sqlx::query(&query).fetch_optional(executor).await?;
    Ok(row.map(|r| r.get("name")))
}
