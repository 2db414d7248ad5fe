//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET      /                       - Home page
//! GET      /about                  - About page
//! GET|POST /contact                - Contact form (POST is accepted and ignored)
//! GET      /health                 - Liveness check
//! GET      /health/ready           - Readiness check (database)
//!
//! # Catalog & cart
//! GET      /products               - Product listing
//! POST     /add_to_cart/{id}       - Add one unit to the cart
//! GET      /cart                   - Cart page with totals
//! GET      /remove_from_cart/{id}  - Remove a cart line
//! GET      /set_language/{lang}    - Set the language tag, back to referrer
//!
//! # Auth
//! GET|POST /signup                 - Create account
//! GET|POST /login                  - Log in
//! GET      /logout                 - Log out (requires auth)
//!
//! # Checkout (requires auth)
//! GET|POST /checkout               - Checkout form / place order
//!
//! # Admin (requires admin)
//! GET      /admin                  - Dashboard
//! GET      /admin/orders           - All orders
//! GET|POST /add                    - Add product (multipart upload)
//! GET      /delete/{id}            - Delete product
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod language;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::error::FormError;
use crate::state::AppState;

/// Largest accepted product upload body.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the catalog and cart routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/add_to_cart/{id}", post(cart::add))
        .route("/cart", get(cart::show))
        .route("/remove_from_cart/{id}", get(cart::remove))
        .route("/set_language/{lang}", get(language::set))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/orders", get(admin::orders))
        .route(
            "/add",
            get(admin::add_product_page)
                .post(admin::add_product)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/delete/{id}", get(admin::delete_product))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Static pages
        .route("/", get(home::home))
        .route("/about", get(home::about))
        .route("/contact", get(home::contact).post(home::contact_submit))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Checkout
        .route(
            "/checkout",
            get(checkout::checkout_page).post(checkout::checkout),
        )
        .merge(shop_routes())
        .merge(auth_routes())
        .merge(admin_routes())
}

// =============================================================================
// Form Helpers
// =============================================================================

/// Take a required form field, failing with the field's name when absent.
///
/// Presence is all that is checked; an empty string is accepted.
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, FormError> {
    value.ok_or(FormError::MissingField(field))
}
