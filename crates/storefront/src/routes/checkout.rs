//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use oliv_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::{RequireAuth, store_cart};
use crate::models::{Cart, NewOrder};
use crate::routes::required;
use crate::state::AppState;

/// Checkout form data.
///
/// Every field must be present; none is otherwise validated.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub username: String,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_id: OrderId,
    pub fullname: String,
}

/// Display the checkout form. No side effects.
pub async fn checkout_page(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    CheckoutTemplate {
        username: user.username.into_inner(),
    }
}

/// Place an order for the current user and empty the cart.
///
/// The cart contents are not recorded on the order, and an empty cart still
/// produces an order.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<impl IntoResponse> {
    let new_order = NewOrder {
        user_id: user.id,
        fullname: required(form.fullname, "fullname")?,
        email: required(form.email, "email")?,
        address: required(form.address, "address")?,
        phone: required(form.phone, "phone")?,
        notes: required(form.notes, "notes")?,
    };

    let order = OrderRepository::new(state.pool()).create(&new_order).await?;
    store_cart(&session, &Cart::default()).await?;

    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", &order.id.to_string())]));
    tracing::info!(order_id = %order.id, "Order placed");

    Ok(ConfirmationTemplate {
        order_id: order.id,
        fullname: order.fullname,
    })
}
