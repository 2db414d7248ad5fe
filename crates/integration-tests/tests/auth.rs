//! Signup, login and logout.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use oliv_integration_tests::{TestContext, TestResponse};

async fn signup(ctx: &mut TestContext, username: &str, password: &str) -> TestResponse {
    ctx.post_form(
        "/signup",
        &[
            ("username", username),
            ("email", "ana@example.com"),
            ("password", password),
        ],
    )
    .await
}

#[tokio::test]
async fn test_signup_creates_one_user_with_hashed_password() {
    let mut ctx = TestContext::new().await;

    let response = signup(&mut ctx, "ana", "pw1").await;

    assert!(response.redirects_to("/login"));
    assert_eq!(ctx.count("users").await, 1);

    let hash: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'ana'")
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_ne!(hash, "pw1");
    assert!(hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let mut ctx = TestContext::new().await;
    signup(&mut ctx, "ana", "pw1").await;

    let response = signup(&mut ctx, "ana", "other").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.body.contains("Username already exists"));
    assert_eq!(ctx.count("users").await, 1);
}

#[tokio::test]
async fn test_signup_missing_field_is_bad_request() {
    let mut ctx = TestContext::new().await;

    let response = ctx
        .post_form("/signup", &[("username", "ana"), ("email", "a@b.c")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("password"));
    assert_eq!(ctx.count("users").await, 0);
}

#[tokio::test]
async fn test_login_then_checkout_is_reachable() {
    let mut ctx = TestContext::new().await;
    signup(&mut ctx, "ana", "pw1").await;

    let response = ctx.login("ana", "pw1").await;
    assert!(response.redirects_to("/"));

    let response = ctx.get("/checkout").await;
    assert_eq!(response.status, StatusCode::OK);

    let home = ctx.get("/").await;
    assert!(home.body.contains("ana"));
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let mut ctx = TestContext::new().await;
    ctx.create_user("ana", "pw1").await;

    let response = ctx.login("ana", "wrong").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid credentials"));
    assert!(ctx.get("/checkout").await.redirects_to("/login"));
}

#[tokio::test]
async fn test_unknown_user_is_unauthorized() {
    let mut ctx = TestContext::new().await;

    let response = ctx.login("nobody", "pw1").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_logout_requires_login() {
    let mut ctx = TestContext::new().await;

    let response = ctx.get("/logout").await;

    assert!(response.redirects_to("/login"));
}

#[tokio::test]
async fn test_logout_ends_authentication_but_keeps_cart() {
    let mut ctx = TestContext::new().await;
    ctx.create_user("ana", "pw1").await;
    ctx.post_form("/add_to_cart/1", &[]).await;
    ctx.login("ana", "pw1").await;

    let response = ctx.get("/logout").await;
    assert!(response.redirects_to("/"));

    assert!(ctx.get("/checkout").await.redirects_to("/login"));
    let cart = ctx.get("/cart").await;
    assert!(cart.body.contains("Oliv Sweet"));
}

#[tokio::test]
async fn test_forged_cookie_is_anonymous() {
    let mut ctx = TestContext::new().await;
    ctx.create_user("ana", "pw1").await;

    let request = axum::http::Request::get("/checkout")
        .header("cookie", "oliv_session=not-a-signed-value")
        .body(axum::body::Body::empty())
        .unwrap();
    ctx.clear_cookies();
    let response = ctx.send(request).await;

    assert!(response.redirects_to("/login"));
}
