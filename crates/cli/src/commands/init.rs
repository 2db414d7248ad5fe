//! Database initialization command.
//!
//! Runs the same bootstrap the server runs on start: idempotent table
//! creation followed by seeding an empty catalog.

use sqlx::SqlitePool;

use oliv_storefront::db;

use super::CommandError;

/// Create tables and seed the default catalog.
///
/// Returns the number of products seeded.
///
/// # Errors
///
/// Returns `CommandError::Repository` if a statement fails.
pub async fn run(pool: &SqlitePool) -> Result<u64, CommandError> {
    tracing::info!("Bootstrapping schema...");
    let seeded = db::init(pool).await?;

    if seeded == 0 {
        tracing::info!("Catalog already populated, nothing seeded");
    } else {
        tracing::info!("Seeded {seeded} products");
    }

    Ok(seeded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn test_init_twice_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("init.db").display());
        let pool = db::create_pool(&SecretString::from(url)).await.unwrap();

        assert_eq!(run(&pool).await.unwrap(), 4);
        assert_eq!(run(&pool).await.unwrap(), 0);
    }
}
