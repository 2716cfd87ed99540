//! Sales endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::errors::Error;

use super::{ApiResponse, AppState, PageQuery};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats", get(stats))
        .route("/date-range", get(by_date_range))
        .route("/product/:id", get(by_product))
        .route("/:id", axum::routing::delete(delete_one))
}

async fn list(
    State(state): State<AppState>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let result = state.sales.list(page.request()).await?;
    Ok(ApiResponse::ok(result))
}

async fn by_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let result = state.sales.list_by_product(&id, page.request()).await?;
    Ok(ApiResponse::ok(result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateRangeParams {
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn by_date_range(
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
    Query(page): PageQuery,
) -> Result<impl IntoResponse, Error> {
    let start = parse_date(range.start_date.as_deref(), "startDate")?;
    let end = parse_date(range.end_date.as_deref(), "endDate")?;
    let result = state
        .sales
        .list_by_date_range(start, end, page.request())
        .await?;
    Ok(ApiResponse::ok(result))
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (read as UTC
/// midnight).
fn parse_date(value: Option<&str>, field: &str) -> Result<DateTime<Utc>, Error> {
    let value = value
        .ok_or_else(|| Error::Validation(format!("{field} is required")))?
        .trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(Error::Validation(format!(
        "{field} must be an ISO 8601 date"
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaleBody {
    product_id: String,
    quantity: i64,
    unit_price: f64,
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<SaleBody>,
) -> Result<impl IntoResponse, Error> {
    let sale = state
        .sales
        .create_sale(&body.product_id, body.quantity, body.unit_price)
        .await?;
    Ok(ApiResponse::created(sale, "sale recorded"))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    state.sales.delete_sale(&id).await?;
    Ok(ApiResponse::message("sale deleted"))
}

async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let stats = state.sales.stats().await?;
    Ok(ApiResponse::ok(stats))
}
