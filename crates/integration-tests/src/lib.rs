//! Integration tests for the Oliv storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p oliv-integration-tests
//! ```
//!
//! Each test builds its own application around a fresh `SQLite` file and
//! upload directory in a temporary directory, then drives the router
//! in-process. No server or network port is involved.
//!
//! # Test Categories
//!
//! - `seed` - Schema bootstrap and catalog seeding
//! - `auth` - Signup, login and logout
//! - `cart` - Cart and language session state
//! - `checkout` - Order placement
//! - `admin` - Admin guard, product upload and deletion

#![allow(clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use oliv_storefront::config::{SentryConfig, StorefrontConfig};
use oliv_storefront::db;
use oliv_storefront::middleware::session::SESSION_COOKIE_NAME;
use oliv_storefront::models::User;
use oliv_storefront::services::auth::AuthService;
use oliv_storefront::state::AppState;

/// High-entropy 64+ character signing secret for test sessions.
const TEST_SESSION_SECRET: &str =
    "k7Qm2ZxV9pLr4TbN8wHs1CjF6yDg3KeU0aXo5RiM-vBnWqEtYlPzJcSdGhAuIfO_";

const MULTIPART_BOUNDARY: &str = "oliv-test-boundary-7d1f";

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront plus a cookie jar holding one session cookie.
pub struct TestContext {
    pub router: Router,
    pub pool: SqlitePool,
    pub upload_dir: PathBuf,
    cookie: Option<String>,
    _dir: TempDir,
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Whether the response redirects to `path`.
    #[must_use]
    pub fn redirects_to(&self, path: &str) -> bool {
        self.status.is_redirection() && self.location.as_deref() == Some(path)
    }
}

impl TestContext {
    /// Start a storefront on a fresh, seeded database.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let database_url = SecretString::from(format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("oliv.db").display()
        ));

        let pool = db::create_pool(&database_url)
            .await
            .expect("Failed to create database pool");
        db::init(&pool)
            .await
            .expect("Failed to initialize database");

        let upload_dir = dir.path().join("static");
        let config = StorefrontConfig {
            database_url,
            host: "127.0.0.1".parse().expect("valid address"),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            upload_dir: upload_dir.clone(),
            sentry: SentryConfig::default(),
        };

        let state = AppState::new(config, pool.clone());
        let router =
            oliv_storefront::app(state, MemoryStore::default()).expect("Failed to build router");

        Self {
            router,
            pool,
            upload_dir,
            cookie: None,
            _dir: dir,
        }
    }

    /// Forget the session cookie, as a new browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a request with the current session cookie and record any
    /// replacement cookie the response sets.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("valid cookie header"),
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            if !pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                continue;
            }
            if value.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                self.cookie = Some(pair.trim().to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path).body(Body::empty()).expect("valid request"))
            .await
    }

    /// GET with a `Referer` header.
    pub async fn get_with_referer(&mut self, path: &str, referer: &str) -> TestResponse {
        let request = Request::get(path)
            .header(header::REFERER, referer)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// POST an url-encoded form.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    /// POST a multipart form with text fields and an optional file part
    /// `(field, filename, bytes)`.
    pub async fn post_multipart(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> TestResponse {
        let body = multipart_body(fields, file);
        let request = Request::post(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    // =========================================================================
    // Account helpers
    // =========================================================================

    /// Create an ordinary account directly in the database.
    pub async fn create_user(&self, username: &str, password: &str) -> User {
        AuthService::new(&self.pool)
            .register(username, password)
            .await
            .expect("Failed to create user")
    }

    /// Create an admin account directly in the database.
    pub async fn create_admin(&self, username: &str, password: &str) -> User {
        AuthService::new(&self.pool)
            .register_admin(username, password)
            .await
            .expect("Failed to create admin")
    }

    /// Log in through the HTTP form.
    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    // =========================================================================
    // Database probes
    // =========================================================================

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }

    /// Path an uploaded image named `filename` would be written to.
    #[must_use]
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
