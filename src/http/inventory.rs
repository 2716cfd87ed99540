//! Inventory movement endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::domain::MovementKind;
use crate::errors::Error;

use super::{ApiResponse, AppState, PageQuery};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/type/:kind", get(by_kind))
        .route("/product/:id", get(by_product))
        .route("/stock-in", post(stock_in))
        .route("/stock-out", post(stock_out))
        .route("/adjust", post(adjust))
        .route("/:id", delete(delete_one))
}

async fn list(
    State(state): State<AppState>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let result = state.inventory.list(page.request()).await?;
    Ok(ApiResponse::ok(result))
}

async fn by_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let kind = MovementKind::parse(&kind)
        .ok_or_else(|| Error::validation("invalid transaction type"))?;
    let result = state.inventory.list_by_kind(kind, page.request()).await?;
    Ok(ApiResponse::ok(result))
}

async fn by_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let result = state
        .inventory
        .list_by_product(&id, page.request())
        .await?;
    Ok(ApiResponse::ok(result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockInBody {
    product_id: String,
    quantity: i64,
    unit_price: f64,
    #[serde(default)]
    reason: Option<String>,
}

async fn stock_in(
    State(state): State<AppState>,
    Json(body): Json<StockInBody>,
) -> Result<impl IntoResponse, Error> {
    let movement = state
        .inventory
        .stock_in(&body.product_id, body.quantity, body.unit_price, body.reason)
        .await?;
    Ok(ApiResponse::created(movement, "stock-in recorded"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockOutBody {
    product_id: String,
    quantity: i64,
    #[serde(default)]
    reason: Option<String>,
}

async fn stock_out(
    State(state): State<AppState>,
    Json(body): Json<StockOutBody>,
) -> Result<impl IntoResponse, Error> {
    let movement = state
        .inventory
        .stock_out(&body.product_id, body.quantity, body.reason)
        .await?;
    Ok(ApiResponse::created(movement, "stock-out recorded"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustBody {
    product_id: String,
    quantity: i64,
    #[serde(default)]
    reason: Option<String>,
}

async fn adjust(
    State(state): State<AppState>,
    Json(body): Json<AdjustBody>,
) -> Result<impl IntoResponse, Error> {
    let movement = state
        .inventory
        .adjust_stock(
            &body.product_id,
            body.quantity,
            body.reason.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(ApiResponse::created(movement, "stock adjusted"))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    state.inventory.delete_movement(&id).await?;
    Ok(ApiResponse::message("transaction deleted"))
}
