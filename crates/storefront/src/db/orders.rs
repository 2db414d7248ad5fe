//! Order repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use oliv_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order};

/// Raw `orders` row.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    fullname: String,
    email: String,
    address: String,
    phone: String,
    notes: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            fullname: row.fullname,
            email: row.email,
            address: row.address,
            phone: row.phone,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, fullname, email, address, phone, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, fullname, email, address, phone, notes, created_at
            ",
        )
        .bind(order.user_id)
        .bind(&order.fullname)
        .bind(&order.email)
        .bind(&order.address)
        .bind(&order.phone)
        .bind(&order.notes)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List every order in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, fullname, email, address, phone, notes, created_at
            FROM orders
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
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

    fn new_order(user_id: i64, fullname: &str) -> NewOrder {
        NewOrder {
            user_id: UserId::new(user_id),
            fullname: fullname.to_string(),
            email: "a@example.com".to_string(),
            address: "1 Rue des Fleurs".to_string(),
            phone: "555-0100".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);

        let first = repo.create(&new_order(1, "Ada")).await.unwrap();
        let second = repo.create(&new_order(2, "Grace")).await.unwrap();

        let orders = repo.list().await.unwrap();
        assert_eq!(orders, vec![first, second]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_user_id_is_not_enforced() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);

        let order = repo.create(&new_order(4242, "Nobody")).await.unwrap();
        assert_eq!(order.user_id, UserId::new(4242));
    }

    #[tokio::test]
    async fn test_created_at_is_stamped_on_insert() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);

        let before = Utc::now();
        let order = repo.create(&new_order(1, "Ada")).await.unwrap();
        let after = Utc::now();

        assert!(order.created_at >= before - chrono::Duration::seconds(1));
        assert!(order.created_at <= after + chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_schema_has_no_created_at_default() {
        let pool = test_pool().await;

        let result = sqlx::query(
            "INSERT INTO orders (user_id, fullname, email, address, phone, notes) \
             VALUES (1, 'Ada', 'a@example.com', 'here', '1', '')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
