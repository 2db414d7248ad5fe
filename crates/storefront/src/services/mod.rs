//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Signup and password login
//! - `cart` - Pricing the session cart against the live catalog
//! - `uploads` - Storing product images under sanitized filenames

pub mod auth;
pub mod cart;
pub mod uploads;
