//! Cart pricing.

use sqlx::SqlitePool;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{Cart, CartView};

/// Prices session carts against the current catalog.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Build the priced view of `cart`.
    ///
    /// Prices are read fresh on every call; products that no longer exist are
    /// dropped from the view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog lookup fails.
    pub async fn view(&self, cart: &Cart) -> Result<CartView, RepositoryError> {
        let products = self.products.get_many(&cart.product_ids()).await?;
        Ok(CartView::build(cart, &products))
    }
}
