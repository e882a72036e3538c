//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Table
//! ```text
//! products
//! ┌──────────────┬───────────────┐
//! │ id (PK)      │ default_stock │
//! ├──────────────┼───────────────┤
//! │ dumplings    │ 25            │
//! │ ice          │ 20            │
//! │ minced meat  │ 4             │
//! └──────────────┴───────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::seeder::ConflictPolicy;
use freezer_core::Product;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    default_stock: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            default_stock: row.default_stock,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// repo.insert(&Product::new("ice", 20)).await?;
/// let ice = repo.get_by_id("ice").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Product id already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_on(&mut *conn, product, ConflictPolicy::Fail).await?;
        Ok(())
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, default_stock FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Gets a product by id, failing when it is missing.
    pub async fn require(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists the whole catalog ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, default_stock FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts catalog products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Inserts one product on an open connection (usually a transaction).
///
/// Returns `false` when `policy` is `Skip` and the id already existed.
pub(crate) async fn insert_on(
    conn: &mut SqliteConnection,
    product: &Product,
    policy: ConflictPolicy,
) -> DbResult<bool> {
    debug!(id = %product.id, default_stock = product.default_stock, "Inserting product");

    let sql = format!(
        "{} INTO products (id, default_stock) VALUES (?1, ?2)",
        policy.insert_verb()
    );

    let result = sqlx::query(&sql)
        .bind(&product.id)
        .bind(product.default_stock)
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::from(e).with_value(&product.id))?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::DbError;
    use freezer_core::Product;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&Product::new("minced meat", 4)).await.unwrap();

        let found = repo.get_by_id("minced meat").await.unwrap();
        assert_eq!(found, Some(Product::new("minced meat", 4)));
        assert_eq!(repo.get_by_id("tofu").await.unwrap(), None);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&Product::new("ice", 20)).await.unwrap();
        let err = repo.insert(&Product::new("ice", 3)).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "products.id");
                assert_eq!(value, "ice");
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_negative_default_hits_check_constraint() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .products()
            .insert(&Product::new("ice", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_require_reports_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&Product::new("ice", 20)).await.unwrap();
        repo.insert(&Product::new("chicken", 2)).await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["chicken", "ice"]);

        let err = repo.require("dumplings").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
