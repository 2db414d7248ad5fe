//! Order placement.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use oliv_integration_tests::TestContext;

const ORDER: [(&str, &str); 5] = [
    ("fullname", "Ana Lopez"),
    ("email", "ana@example.com"),
    ("address", "1 Rue de la Paix"),
    ("phone", "555-0100"),
    ("notes", "Gift wrap"),
];

#[tokio::test]
async fn test_checkout_requires_login() {
    let mut ctx = TestContext::new().await;

    assert!(ctx.get("/checkout").await.redirects_to("/login"));
    assert!(ctx.post_form("/checkout", &ORDER).await.redirects_to("/login"));
    assert_eq!(ctx.count("orders").await, 0);
}

#[tokio::test]
async fn test_checkout_records_order_and_empties_cart() {
    let mut ctx = TestContext::new().await;
    let user = ctx.create_user("ana", "pw1").await;
    ctx.login("ana", "pw1").await;
    ctx.post_form("/add_to_cart/1", &[]).await;

    let response = ctx.post_form("/checkout", &ORDER).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Ana Lopez"));
    assert_eq!(ctx.count("orders").await, 1);

    let (user_id, fullname): (i64, String) =
        sqlx::query_as("SELECT user_id, fullname FROM orders")
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(user_id, user.id.as_i64());
    assert_eq!(fullname, "Ana Lopez");

    assert!(ctx.get("/cart").await.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_still_records_order() {
    let mut ctx = TestContext::new().await;
    ctx.create_user("ana", "pw1").await;
    ctx.login("ana", "pw1").await;

    let response = ctx.post_form("/checkout", &ORDER).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ctx.count("orders").await, 1);
}

#[tokio::test]
async fn test_checkout_missing_field_is_bad_request() {
    let mut ctx = TestContext::new().await;
    ctx.create_user("ana", "pw1").await;
    ctx.login("ana", "pw1").await;
    ctx.post_form("/add_to_cart/1", &[]).await;

    let response = ctx.post_form("/checkout", &ORDER[..4]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("notes"));
    assert_eq!(ctx.count("orders").await, 0);
    assert!(ctx.get("/cart").await.body.contains("Oliv Sweet"));
}
