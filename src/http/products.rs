//! Product endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::domain::{NewProduct, ProductCategory, ProductPatch};
use crate::errors::Error;

use super::{ApiResponse, AppState, PageQuery};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats", get(stats))
        .route("/low-stock", get(low_stock))
        .route("/search", get(search))
        .route("/category/:category", get(by_category))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn list(
    State(state): State<AppState>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let result = state.products.list(page.request()).await?;
    Ok(ApiResponse::ok(result))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let product = state.products.get(&id).await?;
    Ok(ApiResponse::ok(product))
}

async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let category = ProductCategory::parse(&category)
        .ok_or_else(|| Error::validation("invalid product category"))?;
    let result = state
        .products
        .list_by_category(category, page.request())
        .await?;
    Ok(ApiResponse::ok(result))
}

async fn low_stock(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let products = state.products.low_stock().await?;
    Ok(ApiResponse::ok(products))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    keyword: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let keyword = params.keyword.unwrap_or_default();
    let result = state.products.search(&keyword, page.request()).await?;
    Ok(ApiResponse::ok(result))
}

async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let stats = state.products.stats().await?;
    Ok(ApiResponse::ok(stats))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<impl IntoResponse, Error> {
    let product = state.products.create(body).await?;
    Ok(ApiResponse::created(product, "product created"))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductPatch>,
) -> Result<impl IntoResponse, Error> {
    let product = state.products.update(&id, body).await?;
    Ok(ApiResponse::ok(product))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    state.products.delete(&id).await?;
    Ok(ApiResponse::message("product deleted"))
}
