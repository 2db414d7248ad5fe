//! Cart route handlers.
//!
//! The cart lives entirely in the session; these handlers never write to the
//! database.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use oliv_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::{load_cart, store_cart};
use crate::models::CartView;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub cart: CartView,
}

/// Add one unit of a product to the cart.
///
/// The id is not checked against the catalog; unknown ids are dropped when
/// the cart is displayed.
#[instrument(skip(session))]
pub async fn add(session: Session, Path(id): Path<i64>) -> Result<Redirect> {
    let product_id = ProductId::new(id);

    let mut cart = load_cart(&session).await?;
    cart.add(product_id);
    store_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", &id.to_string())]));

    Ok(Redirect::to("/products"))
}

/// Display the cart priced against current catalog prices.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let view = CartService::new(state.pool()).view(&cart).await?;

    Ok(CartTemplate { cart: view })
}

/// Remove a product's line from the cart. Removing an absent line is a no-op.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<i64>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    if cart.remove(ProductId::new(id)) {
        store_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/cart"))
}
