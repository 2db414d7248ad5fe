//! Session-related types.
//!
//! Everything the storefront keeps per browser lives in the session record;
//! the cookie only carries the signed session id.

/// Language tag used when the session has none.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Session keys for storefront data.
pub mod keys {
    /// Key for the logged-in user's ID.
    pub const USER_ID: &str = "user_id";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the language preference tag.
    pub const LANG: &str = "lang";
}
