//! # Seed Run Repository
//!
//! One row per fixture load, written in the same transaction as the data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// A recorded fixture load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SeedRun {
    /// UUID v4.
    pub id: String,
    /// Fixture label (`builtin` or the file path).
    pub fixture: String,
    /// `fail` or `skip`.
    pub conflict_policy: String,
    pub products_inserted: i64,
    pub products_skipped: i64,
    pub freezers_inserted: i64,
    pub freezers_skipped: i64,
    pub stock_inserted: i64,
    pub applied_at: DateTime<Utc>,
}

/// Repository for seed run records.
#[derive(Debug, Clone)]
pub struct SeedRunRepository {
    pool: SqlitePool,
}

impl SeedRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SeedRunRepository { pool }
    }

    /// Records a run outside of a load.
    pub async fn record(&self, run: &SeedRun) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        record_on(&mut *conn, run).await
    }

    /// Returns the most recent run, if any.
    pub async fn latest(&self) -> DbResult<Option<SeedRun>> {
        let run = sqlx::query_as::<_, SeedRun>(
            r#"
            SELECT id, fixture, conflict_policy,
                   products_inserted, products_skipped,
                   freezers_inserted, freezers_skipped,
                   stock_inserted, applied_at
            FROM seed_runs
            ORDER BY applied_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(run)
    }

    /// Counts recorded runs.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seed_runs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Records a run on an open connection.
pub(crate) async fn record_on(conn: &mut SqliteConnection, run: &SeedRun) -> DbResult<()> {
    debug!(id = %run.id, fixture = %run.fixture, "Recording seed run");

    sqlx::query(
        r#"
        INSERT INTO seed_runs (
            id, fixture, conflict_policy,
            products_inserted, products_skipped,
            freezers_inserted, freezers_skipped,
            stock_inserted, applied_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&run.id)
    .bind(&run.fixture)
    .bind(&run.conflict_policy)
    .bind(run.products_inserted)
    .bind(run.products_skipped)
    .bind(run.freezers_inserted)
    .bind(run.freezers_skipped)
    .bind(run.stock_inserted)
    .bind(run.applied_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    fn run(id: &str, applied_at: DateTime<Utc>) -> SeedRun {
        SeedRun {
            id: id.to_string(),
            fixture: "builtin".to_string(),
            conflict_policy: "skip".to_string(),
            products_inserted: 6,
            products_skipped: 0,
            freezers_inserted: 5,
            freezers_skipped: 0,
            stock_inserted: 7,
            applied_at,
        }
    }

    #[tokio::test]
    async fn test_latest_on_empty_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.seed_runs().latest().await.unwrap(), None);
        assert_eq!(db.seed_runs().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latest_picks_newest() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seed_runs();
        let now = Utc::now();

        repo.record(&run("new", now)).await.unwrap();
        repo.record(&run("old", now - Duration::hours(1))).await.unwrap();

        let latest = repo.latest().await.unwrap().unwrap();
        assert_eq!(latest.id, "new");
        assert_eq!(latest.stock_inserted, 7);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
