//! Oliv Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` adds
//! configuration loading, tracing, Sentry and the TCP listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::middleware::session::SessionKeyError;
use crate::state::AppState;

/// Build the storefront router with sessions backed by `store`.
///
/// # Errors
///
/// Returns `SessionKeyError` if the configured session secret cannot sign
/// cookies.
pub fn app<S>(state: AppState, store: S) -> Result<Router, SessionKeyError>
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(store, state.config())?;

    Ok(routes::routes()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::{SentryConfig, StorefrontConfig};

    fn config(session_secret: &str) -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            session_secret: SecretString::from(session_secret),
            upload_dir: "static".into(),
            sentry: SentryConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_app_rejects_short_session_key() {
        let state = AppState::new(config("too-short"), db::test_pool().await);
        assert!(app(state, MemoryStore::default()).is_err());
    }

    #[tokio::test]
    async fn test_app_serves_health_and_unknown_routes() {
        let state = AppState::new(config(&"aZ3-".repeat(20)), db::test_pool().await);
        let router = app(state, MemoryStore::default()).unwrap();

        let response = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_product_id_is_rejected() {
        let state = AppState::new(config(&"aZ3-".repeat(20)), db::test_pool().await);
        let router = app(state, MemoryStore::default()).unwrap();

        let response = router
            .oneshot(
                Request::post("/add_to_cart/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
