//! Product repository for catalog operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use oliv_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, category, price_cents, description, image";

/// Most ids bound into a single `IN (...)` lookup. `SQLite` caps the number of
/// bound parameters per statement.
const LOOKUP_BATCH_SIZE: usize = 500;

/// Raw `products` row.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    category: String,
    price_cents: i64,
    description: String,
    image: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::from_cents(row.price_cents).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            category: row.category,
            price,
            description: row.description,
            image: row.image,
        })
    }
}

/// Insert a product using any executor (pool or open transaction).
pub(super) async fn insert<'e, E>(
    executor: E,
    product: &NewProduct,
) -> Result<Product, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ProductRow>(
        r"
        INSERT INTO products (name, category, price_cents, description, image)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, name, category, price_cents, description, image
        ",
    )
    .bind(&product.name)
    .bind(&product.category)
    .bind(product.price.cents())
    .bind(&product.description)
    .bind(&product.image)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every product in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Product::try_from)
        .collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Product::try_from)
        .transpose()
    }

    /// Get all products whose id is in `ids`, in storage order.
    ///
    /// Unknown ids are skipped. Large id lists are looked up in batches, so
    /// any number of ids is accepted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let mut rows = Vec::new();

        for batch in ids.chunks(LOOKUP_BATCH_SIZE) {
            let mut query: QueryBuilder<'_, Sqlite> =
                QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("));
            let mut separated = query.separated(", ");
            for id in batch {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            rows.extend(
                query
                    .build_query_as::<ProductRow>()
                    .fetch_all(self.pool)
                    .await?,
            );
        }

        rows.sort_by_key(|row| row.id);
        rows.dedup_by_key(|row| row.id);
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        insert(self.pool, product).await
    }

    /// Delete a product. Returns `false` if no product had this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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

    fn new_product(name: &str, cents: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: "Test".to_string(),
            price: Price::from_cents(cents).unwrap(),
            description: format!("{name} description"),
            image: format!("{}.jpg", name.to_lowercase()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&new_product("Amber", 12_345)).await.unwrap();
        assert_eq!(created.price.to_string(), "123.45");

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get_by_id(ProductId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_storage_order() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        for name in ["C", "A", "B"] {
            repo.create(&new_product(name, 100)).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown_ids() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let a = repo.create(&new_product("A", 100)).await.unwrap();
        let b = repo.create(&new_product("B", 200)).await.unwrap();

        let found = repo
            .get_many(&[b.id, ProductId::new(999), a.id])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(repo.get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_many_spans_batches() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let a = repo.create(&new_product("A", 100)).await.unwrap();
        let b = repo.create(&new_product("B", 200)).await.unwrap();

        // Known ids land in different batches; the rest are unknown.
        let mut ids: Vec<ProductId> = (1_000..2_000).map(ProductId::new).collect();
        ids.insert(0, b.id);
        ids.push(a.id);
        ids.push(b.id);

        let found = repo.get_many(&ids).await.unwrap();
        assert_eq!(found, vec![a, b]);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let product = repo.create(&new_product("A", 100)).await.unwrap();

        assert!(repo.delete(product.id).await.unwrap());
        assert!(!repo.delete(product.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
