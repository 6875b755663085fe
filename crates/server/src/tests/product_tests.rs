// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_account, create_test_app, error_message, get, post_json, read_json, scheduled_product,
    send,
};
use axum::http::StatusCode;
use veilingklok_api::{ProductResponse, StatusTransitionResponse};

#[tokio::test]
async fn test_register_and_get_product() {
    let app = create_test_app();
    let supplier = create_account(&app, "Kwekerij Bakker", "supplier").await;
    let product_id = scheduled_product(&app, supplier, "B").await;

    let response = send(&app, get(&format!("/products/{product_id}"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let product: ProductResponse = read_json(response).await;
    assert_eq!(product.status, 2);
    assert_eq!(product.status_name, "scheduled");
    assert_eq!(product.location, "B");
}

#[tokio::test]
async fn test_get_unknown_product_is_404() {
    let app = create_test_app();

    let response = send(&app, get("/products/999")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Product 999 not found");
}

#[tokio::test]
async fn test_register_product_for_buyer_is_422() {
    let app = create_test_app();
    let buyer = create_account(&app, "Bloemenhandel Smit", "buyer").await;

    let response = send(
        &app,
        post_json(
            "/products",
            &serde_json::json!({
                "name": "Gerbera",
                "quantity": 10,
                "minimum_price": 1.0,
                "starting_price": 3.0,
                "location": "A",
                "supplier_id": buyer,
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_account_with_bad_role_is_400() {
    let app = create_test_app();

    let response = send(
        &app,
        post_json(
            "/accounts",
            &serde_json::json!({ "name": "Veilingmeester", "role": "admin" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_with_filters() {
    let app = create_test_app();
    let supplier = create_account(&app, "Kwekerij Bakker", "supplier").await;
    let at_a = scheduled_product(&app, supplier, "A").await;
    scheduled_product(&app, supplier, "C").await;

    let response = send(&app, get("/products?status=scheduled&location=A")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<ProductResponse> = read_json(response).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_id, at_a);

    let response = send(&app, get("/products?status=9")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_twice_is_409() {
    let app = create_test_app();
    let supplier = create_account(&app, "Kwekerij Bakker", "supplier").await;
    let product_id = scheduled_product(&app, supplier, "A").await;

    let response = send(
        &app,
        post_json(
            &format!("/products/{product_id}/schedule"),
            &serde_json::json!({ "date": "2026-04-01" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_product_history() {
    let app = create_test_app();
    let supplier = create_account(&app, "Kwekerij Bakker", "supplier").await;
    let product_id = scheduled_product(&app, supplier, "A").await;

    let response = send(&app, get(&format!("/products/{product_id}/history"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let history: Vec<StatusTransitionResponse> = read_json(response).await;
    let ops: Vec<&str> = history.iter().map(|h| h.operation.as_str()).collect();
    assert_eq!(ops, vec!["register_product", "schedule_product"]);

    let missing = send(&app, get("/products/404/history")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
