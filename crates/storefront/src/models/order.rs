//! Order domain types.

use chrono::{DateTime, Utc};

use oliv_core::{OrderId, UserId};

/// A submitted checkout.
///
/// Contact fields are copied from the checkout form and are independent of
/// the user record. `user_id` is a soft reference with no foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub fullname: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub notes: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// Fields required to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub fullname: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub notes: String,
}
