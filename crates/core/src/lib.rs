//! Oliv Core - Shared types library.
//!
//! This crate provides common types used across all Oliv components:
//! - `storefront` - Public catalog, cart, checkout and admin panel
//! - `cli` - Command-line tools for database setup and admin users
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The optional `sqlite` feature adds sqlx encode/decode support
//! for the id newtypes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
