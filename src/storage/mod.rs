//! Storage implementations.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::StorageConfig;
use crate::interfaces::{MovementStore, ProductStore, SalesStore};

pub mod mock;
pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteMovementStore, SqliteProductStore, SqliteSalesStore};

/// The three store handles the services are built over.
///
/// Constructed once at startup and injected; nothing reaches for an ambient
/// pool.
#[derive(Clone)]
pub struct Stores {
    pub products: Arc<dyn ProductStore>,
    pub movements: Arc<dyn MovementStore>,
    pub sales: Arc<dyn SalesStore>,
}

impl Stores {
    /// Stores backed by one SQLite pool.
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            products: Arc::new(SqliteProductStore::new(pool.clone())),
            movements: Arc::new(SqliteMovementStore::new(pool.clone())),
            sales: Arc::new(SqliteSalesStore::new(pool)),
        }
    }
}

/// Initialize storage based on configuration.
///
/// Creates the database file if missing, runs the schema DDL, and returns
/// the store handles. Foreign keys are enabled on every connection; the
/// ledger tables cascade on product deletion.
pub async fn init_storage(config: &StorageConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    info!("storage: sqlite at {}", config.path);

    if let Some(parent) = std::path::Path::new(&config.path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(Stores::sqlite(pool))
}

/// Create tables and indexes.
pub async fn init_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(schema::CREATE_PRODUCTS_TABLE)
        .execute(pool)
        .await?;
    sqlx::query(schema::CREATE_INVENTORY_TRANSACTIONS_TABLE)
        .execute(pool)
        .await?;
    sqlx::query(schema::CREATE_SALES_RECORDS_TABLE)
        .execute(pool)
        .await?;
    for statement in schema::CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// In-memory database for tests. A single connection keeps every query on
/// the same memory database.
pub async fn memory_pool() -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}
