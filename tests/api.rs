//! End-to-end API tests.
//!
//! Starts an axum server over an in-memory database and exercises it with
//! reqwest.

use reqwest::Client;
use serde_json::{json, Value};

use stockbook::http::{router, AppState};
use stockbook::storage::{memory_pool, Stores};

/// Bind to port 0 and return the actual base URL.
async fn start_server() -> String {
    let pool = memory_pool().await.expect("memory pool");
    let app = router(AppState::new(Stores::sqlite(pool)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn create_product(client: &Client, base: &str, name: &str, stock: i64) -> Value {
    let resp = client
        .post(format!("{base}/api/products"))
        .json(&json!({
            "name": name,
            "category": "pen",
            "description": "smooth rollerball",
            "unit": "piece",
            "price": 4.0,
            "cost": 1.5,
            "stock": stock,
            "minStock": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    body["data"].clone()
}

async fn product_stock(client: &Client, base: &str, id: &str) -> i64 {
    let body: Value = client
        .get(format!("{base}/api/products/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"]["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn health_check() {
    let base = start_server().await;
    let client = Client::new();

    let resp = client.get(format!("{base}/api/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_gets_a_json_404() {
    let base = start_server().await;
    let client = Client::new();

    let resp = client.get(format!("{base}/api/nope")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn product_crud_round_trip() {
    let base = start_server().await;
    let client = Client::new();

    let created = create_product(&client, &base, "Gel Pen", 10).await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["minStock"], 5);
    assert!(created["createdAt"].is_string());

    let listed: Value = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["data"]["total"], 1);
    assert_eq!(listed["data"]["totalPages"], 1);

    let resp = client
        .put(format!("{base}/api/products/{id}"))
        .json(&json!({ "price": 5.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["data"]["price"], 5.5);
    assert_eq!(updated["data"]["name"], "Gel Pen");

    let resp = client
        .delete(format!("{base}/api/products/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{base}/api/products/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn create_product_with_bad_fields_is_rejected() {
    let base = start_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/api/products"))
        .json(&json!({
            "name": "",
            "category": "pen",
            "unit": "piece",
            "price": 4.0,
            "cost": 1.5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn pagination_params_are_honored_and_bounded() {
    let base = start_server().await;
    let client = Client::new();

    for i in 0..3 {
        create_product(&client, &base, &format!("Pen {i}"), 10).await;
    }

    let body: Value = client
        .get(format!("{base}/api/products?page=1&limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{base}/api/products?limit=200"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn search_and_category_filters() {
    let base = start_server().await;
    let client = Client::new();

    create_product(&client, &base, "Gel Pen", 10).await;
    create_product(&client, &base, "Ballpoint", 10).await;

    let body: Value = client
        .get(format!("{base}/api/products/search?keyword=gel"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 1);

    let resp = client
        .get(format!("{base}/api/products/search?keyword="))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = client
        .get(format!("{base}/api/products/category/pen"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 2);

    let resp = client
        .get(format!("{base}/api/products/category/toys"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn stock_flow_from_restock_to_sale() {
    let base = start_server().await;
    let client = Client::new();

    let product = create_product(&client, &base, "Gel Pen", 10).await;
    let id = product["id"].as_str().unwrap();

    // Restock five at 2.00 each.
    let resp = client
        .post(format!("{base}/api/inventory/stock-in"))
        .json(&json!({ "productId": id, "quantity": 5, "unitPrice": 2.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["type"], "in");
    assert_eq!(body["data"]["totalAmount"], 10.0);
    assert_eq!(body["data"]["reason"], "restock");
    assert_eq!(product_stock(&client, &base, id).await, 15);

    // Sell three at 4.00 each.
    let resp = client
        .post(format!("{base}/api/sales"))
        .json(&json!({ "productId": id, "quantity": 3, "unitPrice": 4.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["totalAmount"], 12.0);
    assert_eq!(product_stock(&client, &base, id).await, 12);

    // The sale is mirrored into the movement ledger as an out entry.
    let body: Value = client
        .get(format!("{base}/api/inventory/type/out"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 1);
    let mirror = &body["data"]["data"][0];
    assert_eq!(mirror["quantity"], 3);
    assert_eq!(mirror["reason"], "sale");
    assert_eq!(mirror["productName"], "Gel Pen");

    // Today's revenue includes the sale.
    let body: Value = client
        .get(format!("{base}/api/sales/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["todaySales"], 1);
    assert_eq!(body["data"]["todayRevenue"], 12.0);

    // Selling more than is on hand fails and changes nothing.
    let resp = client
        .post(format!("{base}/api/sales"))
        .json(&json!({ "productId": id, "quantity": 100, "unitPrice": 4.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(product_stock(&client, &base, id).await, 12);

    // Write off four, then reject a zero-quantity adjustment.
    let resp = client
        .post(format!("{base}/api/inventory/adjust"))
        .json(&json!({ "productId": id, "quantity": -4, "reason": "breakage" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(product_stock(&client, &base, id).await, 8);

    let resp = client
        .post(format!("{base}/api/inventory/adjust"))
        .json(&json!({ "productId": id, "quantity": 0, "reason": "noop" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(product_stock(&client, &base, id).await, 8);
}

#[tokio::test]
async fn stock_out_beyond_stock_is_rejected() {
    let base = start_server().await;
    let client = Client::new();

    let product = create_product(&client, &base, "Gel Pen", 2).await;
    let id = product["id"].as_str().unwrap();

    let resp = client
        .post(format!("{base}/api/inventory/stock-out"))
        .json(&json!({ "productId": id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(product_stock(&client, &base, id).await, 2);
}

#[tokio::test]
async fn sales_date_range_endpoint() {
    let base = start_server().await;
    let client = Client::new();

    let product = create_product(&client, &base, "Gel Pen", 10).await;
    let id = product["id"].as_str().unwrap();

    client
        .post(format!("{base}/api/sales"))
        .json(&json!({ "productId": id, "quantity": 1, "unitPrice": 4.0 }))
        .send()
        .await
        .unwrap();

    let start = (chrono::Utc::now() - chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let end = (chrono::Utc::now() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    let body: Value = client
        .get(format!(
            "{base}/api/sales/date-range?startDate={start}&endDate={end}"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 1);

    // Reversed bounds are rejected.
    let resp = client
        .get(format!(
            "{base}/api/sales/date-range?startDate={end}&endDate={start}"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Missing bounds are rejected.
    let resp = client
        .get(format!("{base}/api/sales/date-range"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn deleting_ledger_rows_does_not_touch_stock() {
    let base = start_server().await;
    let client = Client::new();

    let product = create_product(&client, &base, "Gel Pen", 10).await;
    let id = product["id"].as_str().unwrap();

    let resp = client
        .post(format!("{base}/api/inventory/stock-in"))
        .json(&json!({ "productId": id, "quantity": 5, "unitPrice": 1.0 }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let movement_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(product_stock(&client, &base, id).await, 15);

    let resp = client
        .delete(format!("{base}/api/inventory/{movement_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(product_stock(&client, &base, id).await, 15);

    // Deleting it again is a clean 404, nothing half-done.
    let resp = client
        .delete(format!("{base}/api/inventory/{movement_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn product_stats_report_catalog_aggregates() {
    let base = start_server().await;
    let client = Client::new();

    create_product(&client, &base, "Gel Pen", 10).await;
    create_product(&client, &base, "Short Pen", 2).await;

    let body: Value = client
        .get(format!("{base}/api/products/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["totalProducts"], 2);
    assert_eq!(body["data"]["lowStockProducts"], 1);
    // 10 * 1.5 + 2 * 1.5
    assert_eq!(body["data"]["totalValue"], 18.0);
}
