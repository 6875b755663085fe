// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use veilingklok_api::{AccountResponse, ProductResponse};
use veilingklok_domain::{AccountId, ClockPricing, format_date};
use veilingklok_persistence::Persistence;

use crate::clock::ClockBroadcaster;
use crate::live::LiveEventBroadcaster;
use crate::session::ACCOUNT_ID_HEADER;
use crate::{AppState, build_router};

/// Creates app state backed by a fresh in-memory database.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Arc::new(ClockBroadcaster::new(OffsetDateTime::now_utc())),
        live: Arc::new(LiveEventBroadcaster::new()),
        pricing: ClockPricing::new(Duration::from_secs(30)),
    }
}

pub fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

pub fn today() -> String {
    format_date(OffsetDateTime::now_utc().date())
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn post_json<T: Serialize>(uri: &str, body: &T) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn koop(product_id: i64, buyer: Option<AccountId>, sale_price: f64) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/products/{product_id}/koop"))
        .header("content-type", "application/json");
    if let Some(buyer) = buyer {
        builder = builder.header(ACCOUNT_ID_HEADER, buyer.to_string());
    }
    builder
        .body(Body::from(
            serde_json::json!({ "sale_price": sale_price }).to_string(),
        ))
        .unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

/// Reads an error body and returns its message.
pub async fn error_message(response: Response<Body>) -> String {
    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["error"], true);
    body["message"].as_str().unwrap().to_string()
}

pub async fn create_account(app: &Router, name: &str, role: &str) -> AccountId {
    let response = send(
        app,
        post_json("/accounts", &serde_json::json!({ "name": name, "role": role })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let account: AccountResponse = read_json(response).await;
    account.account_id
}

/// Registers a product at `location` and schedules it for today.
pub async fn scheduled_product(app: &Router, supplier: AccountId, location: &str) -> i64 {
    let response = send(
        app,
        post_json(
            "/products",
            &serde_json::json!({
                "name": "Chrysant Baltica",
                "quantity": 80,
                "minimum_price": 2.5,
                "starting_price": 8.0,
                "location": location,
                "supplier_id": supplier,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let product: ProductResponse = read_json(response).await;

    let response = send(
        app,
        post_json(
            &format!("/products/{}/schedule", product.product_id),
            &serde_json::json!({ "date": today() }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    product.product_id
}
