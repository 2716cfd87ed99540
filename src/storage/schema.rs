//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query
//! building, plus the DDL run at startup.

use sea_query::Iden;

/// Products table schema.
#[derive(Iden)]
pub enum Products {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "category"]
    Category,
    #[iden = "description"]
    Description,
    #[iden = "unit"]
    Unit,
    #[iden = "price"]
    Price,
    #[iden = "cost"]
    Cost,
    #[iden = "stock"]
    Stock,
    #[iden = "min_stock"]
    MinStock,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

/// Movement ledger table schema.
#[derive(Iden)]
pub enum InventoryTransactions {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "product_id"]
    ProductId,
    #[iden = "type"]
    Type,
    #[iden = "quantity"]
    Quantity,
    #[iden = "unit_price"]
    UnitPrice,
    #[iden = "total_amount"]
    TotalAmount,
    #[iden = "reason"]
    Reason,
    #[iden = "created_at"]
    CreatedAt,
}

/// Sales ledger table schema.
#[derive(Iden)]
pub enum SalesRecords {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "product_id"]
    ProductId,
    #[iden = "quantity"]
    Quantity,
    #[iden = "unit_price"]
    UnitPrice,
    #[iden = "total_amount"]
    TotalAmount,
    #[iden = "created_at"]
    CreatedAt,
}

/// SQL for creating the products table.
pub const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL CHECK (category IN ('pen', 'paper', 'office', 'other')),
    description TEXT,
    unit TEXT NOT NULL,
    price REAL NOT NULL,
    cost REAL NOT NULL,
    stock INTEGER NOT NULL DEFAULT 0,
    min_stock INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// SQL for creating the movement ledger table.
pub const CREATE_INVENTORY_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS inventory_transactions (
    id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    type TEXT NOT NULL CHECK (type IN ('in', 'out', 'adjust')),
    quantity INTEGER NOT NULL,
    unit_price REAL,
    total_amount REAL,
    reason TEXT,
    created_at TEXT NOT NULL
);
"#;

/// SQL for creating the sales ledger table.
pub const CREATE_SALES_RECORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sales_records (
    id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL,
    total_amount REAL NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Secondary indexes for the read paths. Not invariant-bearing.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_transactions_product_id ON inventory_transactions(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_transactions_type ON inventory_transactions(type)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_transactions_created_at ON inventory_transactions(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_sales_records_product_id ON sales_records(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_records_created_at ON sales_records(created_at)",
];
