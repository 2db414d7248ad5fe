//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user
//! OLIV_ADMIN_PASSWORD=... oliv-cli admin create -u alice
//!
//! # Promote an account created through /signup
//! oliv-cli admin promote -u bob
//! ```

use sqlx::SqlitePool;

use oliv_storefront::db;
use oliv_storefront::models::User;
use oliv_storefront::services::auth::AuthService;

use super::CommandError;

/// Create a new admin user.
///
/// The schema is bootstrapped first so this works on a fresh database.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the username is invalid or taken.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, CommandError> {
    db::bootstrap(pool).await?;

    tracing::info!("Creating admin user: {}", username);
    let user = AuthService::new(pool)
        .register_admin(username, password)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(user)
}

/// Grant the admin flag to an existing user.
///
/// # Errors
///
/// Returns `CommandError::Auth` if no user has this username.
pub async fn promote_user(pool: &SqlitePool, username: &str) -> Result<User, CommandError> {
    db::bootstrap(pool).await?;

    let user = AuthService::new(pool).promote(username).await?;

    tracing::info!("User {} (ID {}) is now an admin", user.username, user.id);
    Ok(user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use oliv_storefront::services::auth::AuthError;

    async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let url = format!("sqlite://{}", dir.path().join("cli.db").display());
        db::create_pool(&SecretString::from(url)).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_admin_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        let user = create_user(&pool, "root", "pw").await.unwrap();
        assert!(user.is_admin);

        let again = create_user(&pool, "root", "pw").await.unwrap_err();
        assert!(matches!(
            again,
            CommandError::Auth(AuthError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_promote_missing_user() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        let err = promote_user(&pool, "ghost").await.unwrap_err();
        assert!(matches!(err, CommandError::Auth(AuthError::UserNotFound)));
    }
}
