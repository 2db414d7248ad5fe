//! Product listing handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::language;
use crate::models::Product;
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub products: Vec<Product>,
    pub lang: String,
}

/// Display every product with the session's language tag.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let lang = language(&session).await?;

    Ok(ProductsTemplate { products, lang })
}
