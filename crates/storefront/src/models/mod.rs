//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database row
//! types. Rows are converted in the `db` layer, where corrupt values surface as
//! `RepositoryError::DataCorruption`.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine, CartLineView, CartView};
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product};
pub use user::User;
