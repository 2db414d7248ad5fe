//! Admin route handlers.
//!
//! Every handler here takes `RequireAdmin`, so anonymous visitors are sent to
//! the login page and non-admins to the home page before anything runs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use oliv_core::{Price, ProductId};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, FormError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Order, Product};
use crate::services::uploads::{sanitize_filename, save_image};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub products: Vec<Product>,
    pub total_orders: i64,
}

/// Admin order list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<Order>,
}

/// Add product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/add_product.html")]
pub struct AddProductTemplate;

// =============================================================================
// Product Upload Parsing
// =============================================================================

/// A parsed "add product" submission.
#[derive(Debug)]
pub struct ProductUpload {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub description: String,
    /// Sanitized image filename.
    pub filename: String,
    pub image: Bytes,
}

impl ProductUpload {
    /// Read every field from a multipart body.
    ///
    /// Unknown fields are ignored. The first occurrence of a repeated field
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` naming the first absent field,
    /// `FormError::InvalidPrice` for a non-numeric or negative price,
    /// `FormError::InvalidFilename` when the upload's filename sanitizes to
    /// nothing, and `FormError::Multipart` if the body is malformed.
    pub async fn from_multipart(mut multipart: Multipart) -> std::result::Result<Self, FormError> {
        let mut name = None;
        let mut category = None;
        let mut price = None;
        let mut description = None;
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| FormError::Multipart(e.body_text()))?
        {
            let Some(field_name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field_name.as_str() {
                "image" if image.is_none() => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| FormError::Multipart(e.body_text()))?;
                    image = Some((file_name, bytes));
                }
                "name" | "category" | "price" | "description" => {
                    let slot = match field_name.as_str() {
                        "name" => &mut name,
                        "category" => &mut category,
                        "price" => &mut price,
                        _ => &mut description,
                    };
                    let text = field
                        .text()
                        .await
                        .map_err(|e| FormError::Multipart(e.body_text()))?;
                    slot.get_or_insert(text);
                }
                _ => {}
            }
        }

        let name = name.ok_or(FormError::MissingField("name"))?;
        let category = category.ok_or(FormError::MissingField("category"))?;
        let price = price.ok_or(FormError::MissingField("price"))?;
        let description = description.ok_or(FormError::MissingField("description"))?;
        let (file_name, image) = image.ok_or(FormError::MissingField("image"))?;

        let price = Price::parse(&price).map_err(|e| FormError::InvalidPrice(e.to_string()))?;
        let filename = sanitize_filename(&file_name).ok_or(FormError::InvalidFilename)?;

        Ok(Self {
            name,
            category,
            price,
            description,
            filename,
            image,
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the dashboard: the catalog and the total number of orders.
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let total_orders = OrderRepository::new(state.pool()).count().await?;

    Ok(DashboardTemplate {
        products,
        total_orders,
    })
}

/// List every order in storage order.
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(OrdersTemplate { orders })
}

/// Display the add product form.
pub async fn add_product_page(RequireAdmin(_admin): RequireAdmin) -> impl IntoResponse {
    AddProductTemplate
}

/// Create a product from a multipart upload.
///
/// The image is written first; if the database insert then fails, a newly
/// created image file is removed again.
#[instrument(skip(state, admin, multipart), fields(user_id = %admin.id))]
pub async fn add_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Redirect> {
    let upload = ProductUpload::from_multipart(multipart).await?;

    let stored = save_image(&state.config().upload_dir, &upload.filename, &upload.image).await?;

    let new_product = NewProduct {
        name: upload.name,
        category: upload.category,
        price: upload.price,
        description: upload.description,
        image: stored.filename.clone(),
    };

    match ProductRepository::new(state.pool()).create(&new_product).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, image = %product.image, "Product created");
            Ok(Redirect::to("/admin"))
        }
        Err(e) => {
            stored.discard().await;
            Err(e.into())
        }
    }
}

/// Delete a product. Unknown ids are a 404.
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    let product_id = ProductId::new(id);

    if !ProductRepository::new(state.pool()).delete(product_id).await? {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    tracing::info!(%product_id, "Product deleted");
    Ok(Redirect::to("/admin"))
}
