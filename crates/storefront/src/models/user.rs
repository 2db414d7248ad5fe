//! User domain types.

use oliv_core::{UserId, Username};

/// A storefront user (domain type).
///
/// The password hash is deliberately absent; it is only read through
/// `UserRepository::get_password_hash` during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique across users.
    pub username: Username,
    /// Whether the user may access the admin panel.
    pub is_admin: bool,
}
