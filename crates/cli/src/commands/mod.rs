//! CLI subcommands.

pub mod admin;
pub mod init;

use sqlx::SqlitePool;
use thiserror::Error;

use oliv_storefront::db::{self, RepositoryError};
use oliv_storefront::services::auth::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema or seed failure.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Account operation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Open the storefront database named by `OLIV_DATABASE_URL`.
///
/// # Errors
///
/// Returns `CommandError::Database` if the database cannot be opened.
pub async fn connect() -> Result<SqlitePool, CommandError> {
    let database_url = oliv_storefront::config::database_url_from_env();

    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&database_url).await?)
}
