//! Database operations for the storefront `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Site accounts with an admin flag
//! - `products` - The perfume catalog (prices in integer cents)
//! - `orders` - Submitted checkouts
//! - `tower_sessions` - Session records (created by the session store)
//!
//! # Schema
//!
//! There are no migrations. [`bootstrap`] applies `schema.sql`, whose
//! statements are all `CREATE TABLE IF NOT EXISTS`, on every start, and
//! [`seed_catalog`] fills an empty catalog with the default perfumes.

pub mod orders;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::models::product::{NewProduct, SEED_CATALOG};

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

const SCHEMA: &str = include_str!("schema.sql");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist yet.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options =
        SqliteConnectOptions::from_str(database_url.expose_secret())?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create the storefront tables if they do not exist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a statement fails.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Insert the default catalog when the products table is empty.
///
/// Runs in one transaction; returns the number of products inserted, which is
/// zero when the catalog already has rows.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails. Nothing is inserted
/// in that case.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<u64, RepositoryError> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for seed in &SEED_CATALOG {
        let product = NewProduct::try_from(*seed).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid seed price for {}: {e}", seed.name))
        })?;
        products::insert(&mut *tx, &product).await?;
        inserted += 1;
    }

    tx.commit().await?;
    tracing::info!(count = inserted, "Seeded default catalog");

    Ok(inserted)
}

/// Bootstrap the schema and seed the catalog.
///
/// This is what both the server and `oliv-cli init` run on start.
///
/// # Errors
///
/// Returns `RepositoryError` if either step fails.
pub async fn init(pool: &SqlitePool) -> Result<u64, RepositoryError> {
    bootstrap(pool).await?;
    seed_catalog(pool).await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Single-connection in-memory pool with the schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    bootstrap(&pool).await.expect("apply schema");
    pool
}
