//! User repository for database operations.

use sqlx::SqlitePool;

use oliv_core::{UserId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::User;

/// Raw `users` row.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            username,
            is_admin: row.is_admin,
        })
    }
}

/// Raw `users` row including the password hash.
#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new (non-admin) user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, is_admin
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;

        row.try_into()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>("SELECT id, username, is_admin FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, is_admin FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    /// Get a user together with their password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, username, is_admin, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Set or clear a user's admin flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this username.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_admin(&self, username: &str, is_admin: bool) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users SET is_admin = ?
            WHERE username = ?
            RETURNING id, username, is_admin
            ",
        )
        .bind(is_admin)
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .try_into()
    }

    /// Count all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn name(s: &str) -> Username {
        Username::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let user = repo.create(&name("alice"), "hash").await.unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.username.as_str(), "alice");

        let by_id = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let by_name = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create(&name("alice"), "hash").await.unwrap();
        let err = repo.create(&name("alice"), "other").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_password_hash() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        repo.create(&name("alice"), "$argon2id$stub").await.unwrap();

        let (user, hash) = repo.get_password_hash("alice").await.unwrap().unwrap();
        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_set_admin() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        repo.create(&name("alice"), "hash").await.unwrap();

        let promoted = repo.set_admin("alice", true).await.unwrap();
        assert!(promoted.is_admin);

        let missing = repo.set_admin("nobody", true).await.unwrap_err();
        assert!(matches!(missing, RepositoryError::NotFound));
    }
}
