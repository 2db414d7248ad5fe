//! Authentication service.
//!
//! Provides username/password signup and login. Passwords are hashed with
//! Argon2id using a random salt and stored as PHC strings.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use oliv_core::Username;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Hash checked when the username is unknown, so that login costs one Argon2
/// verification whether or not the account exists.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("oliv-unknown-user").ok());

/// Authentication service.
///
/// Handles user registration, login, and admin promotion.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new (non-admin) user with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is blank or too long.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken; no row
    /// is written in that case.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Register a user and grant the admin flag.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::register`].
    pub async fn register_admin(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self.register(username, password).await?;
        self.promote(user.username.as_str()).await
    }

    /// Grant the admin flag to an existing user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has this username.
    pub async fn promote(&self, username: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .set_admin(username.trim(), true)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User promoted to admin");
        Ok(user)
    }

    /// Login with username and password.
    ///
    /// Unknown usernames and wrong passwords produce the same error and both
    /// run a full password verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some((user, password_hash)) = self.users.get_password_hash(username.trim()).await?
        else {
            if let Some(dummy) = DUMMY_PASSWORD_HASH.as_deref() {
                // Always fails; only the work matters.
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();

        assert_ne!(first, "hunter22");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &first).is_ok());
        assert!(matches!(
            verify_password("hunter23", &first),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_malformed_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_matches_real_hash_cost() {
        let dummy = DUMMY_PASSWORD_HASH.as_deref().unwrap();
        let real = hash_password("s3cret").unwrap();

        let dummy = PasswordHash::new(dummy).unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(dummy.algorithm, real.algorithm);
        assert_eq!(dummy.params, real.params);

        // The dummy never accepts a guessed password.
        assert!(verify_password("oliv-unknown-user-x", &dummy.to_string()).is_err());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth.register("alice", "s3cret").await.unwrap();
        assert!(!user.is_admin);

        let logged_in = auth.login("alice", "s3cret").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        auth.register("alice", "s3cret").await.unwrap();

        let wrong_password = auth.login("alice", "nope").await.unwrap_err();
        let unknown_user = auth.login("mallory", "s3cret").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        auth.register("alice", "one").await.unwrap();

        let err = auth.register("alice", "two").await.unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_blank_username() {
        let pool = test_pool().await;
        let err = AuthService::new(&pool).register("  ", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidUsername(_)));
    }

    #[tokio::test]
    async fn test_register_admin_and_promote() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let admin = auth.register_admin("root", "pw").await.unwrap();
        assert!(admin.is_admin);

        auth.register("bob", "pw").await.unwrap();
        assert!(auth.promote("bob").await.unwrap().is_admin);
        assert!(matches!(
            auth.promote("ghost").await.unwrap_err(),
            AuthError::UserNotFound
        ));
    }
}
