//! # Freezer Repository
//!
//! Database operations for freezers and their stock entries.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Freezer document                     Rows                              │
//! │                                                                         │
//! │  {                                    freezers                          │
//! │    id: "Panasonic ultra cool",  ───►  id | owner | model_name | year   │
//! │    owner: "ИП Борис",                                                   │
//! │    model: {Cooler Master, 2022},                                        │
//! │    products: [                        freezer_stock                     │
//! │      {ice, 1},                  ───►  freezer_id | product_id | qty    │
//! │      {chicken, 2},                    UNIQUE (freezer_id, product_id)  │
//! │      {mapo-tofu, 4}                                                     │
//! │    ]                                                                    │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A freezer row and its stock rows are always written in the same
//! transaction.

use std::collections::BTreeMap;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::seeder::ConflictPolicy;
use freezer_core::{Freezer, FreezerModel, StockEntry};

#[derive(Debug, sqlx::FromRow)]
struct FreezerRow {
    id: String,
    owner: Option<String>,
    model_name: String,
    model_year: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    freezer_id: String,
    product_id: String,
    quantity: i64,
}

impl FreezerRow {
    fn into_freezer(self, products: Vec<StockEntry>) -> Freezer {
        Freezer {
            id: self.id,
            owner: self.owner,
            model: FreezerModel {
                name: self.model_name,
                year: self.model_year,
            },
            products,
        }
    }
}

/// Repository for freezer database operations.
#[derive(Debug, Clone)]
pub struct FreezerRepository {
    pool: SqlitePool,
}

impl FreezerRepository {
    /// Creates a new FreezerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FreezerRepository { pool }
    }

    /// Inserts a freezer together with its stock entries.
    ///
    /// ## Returns
    /// * `Ok(())` - Freezer and all entries inserted
    /// * `Err(DbError::UniqueViolation)` - Freezer id already exists, or
    ///   the same product appears twice in `freezer.products`
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown product id
    pub async fn insert(&self, freezer: &Freezer) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        insert_on(&mut *tx, freezer, ConflictPolicy::Fail).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Gets a freezer (with stock) by its id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Freezer>> {
        let row = sqlx::query_as::<_, FreezerRow>(
            "SELECT id, owner, model_name, model_year FROM freezers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stock = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT freezer_id, product_id, quantity
            FROM freezer_stock
            WHERE freezer_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_freezer(stock.into_iter().map(stock_entry).collect())))
    }

    /// Gets a freezer by id, failing when it is missing.
    pub async fn require(&self, id: &str) -> DbResult<Freezer> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Freezer", id))
    }

    /// Lists every freezer with its stock, ordered by id.
    ///
    /// Two queries total, stock rows are grouped in memory.
    pub async fn list(&self) -> DbResult<Vec<Freezer>> {
        let rows = sqlx::query_as::<_, FreezerRow>(
            "SELECT id, owner, model_name, model_year FROM freezers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let stock = sqlx::query_as::<_, StockRow>(
            "SELECT freezer_id, product_id, quantity FROM freezer_stock ORDER BY freezer_id, product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: BTreeMap<String, Vec<StockEntry>> = BTreeMap::new();
        for row in stock {
            grouped
                .entry(row.freezer_id.clone())
                .or_default()
                .push(stock_entry(row));
        }

        let freezers: Vec<Freezer> = rows
            .into_iter()
            .map(|row| {
                let products = grouped.remove(&row.id).unwrap_or_default();
                row.into_freezer(products)
            })
            .collect();

        debug!(count = freezers.len(), "Listed freezers");
        Ok(freezers)
    }

    /// Lists freezer ids, one page at a time.
    ///
    /// `None` for `limit` means no limit; `None` for `offset` starts at the
    /// first id.
    pub async fn list_ids(&self, limit: Option<u32>, offset: Option<u32>) -> DbResult<Vec<String>> {
        // LIMIT -1 is "no limit" in SQLite
        let limit = limit.map(i64::from).unwrap_or(-1);
        let offset = offset.map(i64::from).unwrap_or(0);

        let ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM freezers ORDER BY id LIMIT ?1 OFFSET ?2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    /// Counts freezers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM freezers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts stock entries across all freezers.
    pub async fn stock_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM freezer_stock")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn stock_entry(row: StockRow) -> StockEntry {
    StockEntry {
        product_id: row.product_id,
        quantity: row.quantity,
    }
}

/// Inserts one freezer and its stock on an open connection.
///
/// ## Returns
/// * `Ok(Some(n))` - Freezer inserted with `n` stock entries
/// * `Ok(None)` - `policy` is `Skip` and the freezer id already existed;
///   its stock is left untouched
pub(crate) async fn insert_on(
    conn: &mut SqliteConnection,
    freezer: &Freezer,
    policy: ConflictPolicy,
) -> DbResult<Option<usize>> {
    debug!(id = %freezer.id, entries = freezer.products.len(), "Inserting freezer");

    let sql = format!(
        "{} INTO freezers (id, owner, model_name, model_year) VALUES (?1, ?2, ?3, ?4)",
        policy.insert_verb()
    );

    let result = sqlx::query(&sql)
        .bind(&freezer.id)
        .bind(&freezer.owner)
        .bind(&freezer.model.name)
        .bind(freezer.model.year)
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::from(e).with_value(&freezer.id))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    // A fresh freezer has no stock yet, so a duplicate here is a duplicate
    // inside the document itself and always fails.
    for entry in &freezer.products {
        sqlx::query(
            "INSERT INTO freezer_stock (freezer_id, product_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(&freezer.id)
        .bind(&entry.product_id)
        .bind(entry.quantity)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbError::from(e).with_value(format!("{} / {}", freezer.id, entry.product_id))
        })?;
    }

    Ok(Some(freezer.products.len()))
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::DbError;
    use freezer_core::{Freezer, FreezerModel, Product, StockEntry};

    async fn db_with_catalog() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (id, default_stock) in [("ice", 20), ("chicken", 2), ("mapo-tofu", 7)] {
            db.products()
                .insert(&Product::new(id, default_stock))
                .await
                .unwrap();
        }
        db
    }

    fn panasonic() -> Freezer {
        Freezer {
            id: "Panasonic ultra cool".to_string(),
            owner: Some("ИП Борис".to_string()),
            model: FreezerModel {
                name: "Cooler Master".to_string(),
                year: 2022,
            },
            products: vec![
                StockEntry::new("ice", 1),
                StockEntry::new("chicken", 2),
                StockEntry::new("mapo-tofu", 4),
            ],
        }
    }

    fn empty(id: &str) -> Freezer {
        Freezer {
            id: id.to_string(),
            owner: None,
            model: FreezerModel {
                name: "Rider".to_string(),
                year: 2011,
            },
            products: vec![],
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = db_with_catalog().await;
        let repo = db.freezers();

        repo.insert(&panasonic()).await.unwrap();

        let stored = repo.get_by_id("Panasonic ultra cool").await.unwrap().unwrap();
        assert_eq!(stored.owner.as_deref(), Some("ИП Борис"));
        assert_eq!(stored.model.year, 2022);
        // Read back sorted by product id
        assert_eq!(stored.products, panasonic().sorted_products());
        assert_eq!(repo.stock_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_stock_entry() {
        let db = db_with_catalog().await;
        let repo = db.freezers();

        let mut freezer = empty("Horizont M2");
        freezer.products = vec![StockEntry::new("ice", 1), StockEntry::new("ice", 2)];

        let err = repo.insert(&freezer).await.unwrap_err();
        assert!(err.is_unique_violation());

        // Whole freezer rolled back
        assert_eq!(repo.get_by_id("Horizont M2").await.unwrap(), None);
        assert_eq!(repo.stock_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_foreign_key_violation() {
        let db = db_with_catalog().await;

        let mut freezer = empty("Horizont M2");
        freezer.products = vec![StockEntry::new("dumplings", 23)];

        let err = db.freezers().insert(&freezer).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.freezers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_freezer_id() {
        let db = db_with_catalog().await;
        let repo = db.freezers();

        repo.insert(&empty("ATLANT М3223-R")).await.unwrap();
        let err = repo.insert(&empty("ATLANT М3223-R")).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "freezers.id");
                assert_eq!(value, "ATLANT М3223-R");
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_groups_stock() {
        let db = db_with_catalog().await;
        let repo = db.freezers();

        repo.insert(&panasonic()).await.unwrap();
        repo.insert(&empty("ATLANT М3223-R")).await.unwrap();

        let freezers = repo.list().await.unwrap();
        assert_eq!(freezers.len(), 2);
        assert_eq!(freezers[0].id, "ATLANT М3223-R");
        assert!(freezers[0].products.is_empty());
        assert_eq!(freezers[1].products.len(), 3);
    }

    #[tokio::test]
    async fn test_list_ids_paging() {
        let db = db_with_catalog().await;
        let repo = db.freezers();

        for id in ["a", "b", "c", "d"] {
            repo.insert(&empty(id)).await.unwrap();
        }

        assert_eq!(repo.list_ids(None, None).await.unwrap(), vec!["a", "b", "c", "d"]);
        assert_eq!(repo.list_ids(Some(2), None).await.unwrap(), vec!["a", "b"]);
        assert_eq!(repo.list_ids(Some(2), Some(2)).await.unwrap(), vec!["c", "d"]);
        assert_eq!(repo.list_ids(None, Some(3)).await.unwrap(), vec!["d"]);
        assert!(repo.list_ids(Some(2), Some(10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_require_missing() {
        let db = db_with_catalog().await;
        let err = db.freezers().require("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Freezer not found: nope");
    }
}
