//! HTTP surface: thin request/response translation over the services.

mod inventory;
mod products;
mod response;
mod sales;

pub use response::ApiResponse;

use std::sync::Arc;

use axum::extract::Query;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domain::PageRequest;
use crate::services::{InventoryService, ProductService, SalesService};
use crate::storage::Stores;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
    pub inventory: Arc<InventoryService>,
    pub sales: Arc<SalesService>,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        Self {
            products: Arc::new(ProductService::new(stores.products)),
            inventory: Arc::new(InventoryService::new(stores.movements)),
            sales: Arc::new(SalesService::new(stores.sales)),
        }
    }
}

/// `page`/`limit` query parameters, defaulted when absent. Range checks
/// happen in the services.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    page: Option<u32>,
    limit: Option<u32>,
}

impl PageParams {
    pub(crate) fn request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        )
    }
}

pub(crate) type PageQuery = Query<PageParams>;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/products", products::routes())
        .nest("/api/inventory", inventory::routes())
        .nest("/api/sales", sales::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "stockbook API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(format!("route {uri} does not exist"))),
    )
}
