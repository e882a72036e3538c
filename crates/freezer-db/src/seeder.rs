//! # Seeder
//!
//! Loads a [`Fixture`] into the store in a single transaction.
//!
//! ## Load Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Seeder::load(fixture, policy, label)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_fixture ── invalid? ──► SeedError::Fixture (nothing written)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────── SINGLE TRANSACTION ───────────────────────┐   │
//! │  │  1. INSERT [OR IGNORE] products                                  │   │
//! │  │  2. INSERT [OR IGNORE] freezers + freezer_stock                  │   │
//! │  │  3. INSERT seed_runs                                             │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← any error before this point rolls everything back            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conflict Policy
//! - `Fail`: the first duplicate key aborts the run with
//!   `DbError::UniqueViolation`, store unchanged.
//! - `Skip`: rows whose key already exists are left alone and counted as
//!   skipped. Running the same fixture twice is then a no-op.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::seed_run::{self, SeedRun};
use crate::repository::{freezer, product};
use freezer_core::validation::validate_fixture;
use freezer_core::{CoreError, Fixture};

// =============================================================================
// Conflict Policy
// =============================================================================

/// What to do when a product or freezer id is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Surface the duplicate-key error and roll back.
    #[default]
    Fail,
    /// Treat duplicate keys as success.
    Skip,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::Fail => "fail",
            ConflictPolicy::Skip => "skip",
        }
    }

    /// SQL verb used for keyed inserts under this policy.
    pub(crate) fn insert_verb(self) -> &'static str {
        match self {
            ConflictPolicy::Fail => "INSERT",
            ConflictPolicy::Skip => "INSERT OR IGNORE",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(ConflictPolicy::Fail),
            "skip" => Ok(ConflictPolicy::Skip),
            other => Err(format!("expected 'fail' or 'skip', got '{other}'")),
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Counts from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub run_id: String,
    pub products_inserted: usize,
    pub products_skipped: usize,
    pub freezers_inserted: usize,
    pub freezers_skipped: usize,
    pub stock_inserted: usize,
}

impl SeedSummary {
    /// True when the run wrote no product, freezer or stock row.
    pub fn is_noop(&self) -> bool {
        self.products_inserted == 0 && self.freezers_inserted == 0 && self.stock_inserted == 0
    }
}

/// Counts read back by [`Seeder::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub products: usize,
    pub freezers: usize,
    pub stock_entries: usize,
}

/// One difference between a fixture and the stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub entity: &'static str,
    pub id: String,
    pub reason: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.entity, self.id, self.reason)
    }
}

/// Errors from loading or verifying a fixture.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Fixture failed its integrity checks.
    #[error(transparent)]
    Fixture(#[from] CoreError),

    /// Storage rejected the load.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Stored data differs from the fixture.
    #[error("Stored data differs from fixture: {}", join_mismatches(.mismatches))]
    Mismatch { mismatches: Vec<Mismatch> },
}

fn join_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type SeedResult<T> = Result<T, SeedError>;

// =============================================================================
// Seeder
// =============================================================================

/// Loads fixtures into a [`Database`].
#[derive(Debug, Clone)]
pub struct Seeder {
    db: Database,
}

impl Seeder {
    pub fn new(db: Database) -> Self {
        Seeder { db }
    }

    /// Validates and loads `fixture` in one transaction.
    ///
    /// ## Arguments
    /// * `fixture` - Data to load
    /// * `policy` - Duplicate-key handling
    /// * `label` - Recorded in `seed_runs.fixture` (e.g. `builtin`)
    pub async fn load(
        &self,
        fixture: &Fixture,
        policy: ConflictPolicy,
        label: &str,
    ) -> SeedResult<SeedSummary> {
        validate_fixture(fixture)?;

        info!(
            fixture = %label,
            policy = %policy,
            products = fixture.products.len(),
            freezers = fixture.freezers.len(),
            "Loading fixture"
        );

        let summary = self.load_validated(fixture, policy, label).await?;

        info!(
            run_id = %summary.run_id,
            products_inserted = summary.products_inserted,
            products_skipped = summary.products_skipped,
            freezers_inserted = summary.freezers_inserted,
            freezers_skipped = summary.freezers_skipped,
            stock_inserted = summary.stock_inserted,
            "Fixture loaded"
        );

        Ok(summary)
    }

    async fn load_validated(
        &self,
        fixture: &Fixture,
        policy: ConflictPolicy,
        label: &str,
    ) -> DbResult<SeedSummary> {
        let mut summary = SeedSummary {
            run_id: Uuid::new_v4().to_string(),
            ..SeedSummary::default()
        };

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for item in &fixture.products {
            if product::insert_on(&mut *tx, item, policy).await? {
                summary.products_inserted += 1;
            } else {
                warn!(id = %item.id, "Product already present, skipped");
                summary.products_skipped += 1;
            }
        }

        for item in &fixture.freezers {
            match freezer::insert_on(&mut *tx, item, policy).await? {
                Some(entries) => {
                    summary.freezers_inserted += 1;
                    summary.stock_inserted += entries;
                }
                None => {
                    warn!(id = %item.id, "Freezer already present, skipped");
                    summary.freezers_skipped += 1;
                }
            }
        }

        let run = SeedRun {
            id: summary.run_id.clone(),
            fixture: label.to_string(),
            conflict_policy: policy.to_string(),
            products_inserted: summary.products_inserted as i64,
            products_skipped: summary.products_skipped as i64,
            freezers_inserted: summary.freezers_inserted as i64,
            freezers_skipped: summary.freezers_skipped as i64,
            stock_inserted: summary.stock_inserted as i64,
            applied_at: Utc::now(),
        };
        seed_run::record_on(&mut *tx, &run).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(run_id = %summary.run_id, "Seed transaction committed");
        Ok(summary)
    }

    /// Reads the store back and checks it against `fixture`.
    ///
    /// ## Checks
    /// 1. Every fixture product is stored with the same default
    /// 2. Every fixture freezer is stored with the same owner, model and stock
    /// 3. The stored data as a whole passes `validate_fixture`
    pub async fn verify(&self, fixture: &Fixture) -> SeedResult<VerifyReport> {
        let stored = Fixture {
            products: self.db.products().list().await?,
            freezers: self.db.freezers().list().await?,
        };

        let mut mismatches = Vec::new();

        for expected in &fixture.products {
            match stored.product(&expected.id) {
                None => mismatches.push(Mismatch {
                    entity: "product",
                    id: expected.id.clone(),
                    reason: "missing".to_string(),
                }),
                Some(found) if found.default_stock != expected.default_stock => {
                    mismatches.push(Mismatch {
                        entity: "product",
                        id: expected.id.clone(),
                        reason: format!(
                            "default is {}, expected {}",
                            found.default_stock, expected.default_stock
                        ),
                    })
                }
                Some(_) => {}
            }
        }

        for expected in &fixture.freezers {
            let Some(found) = stored.freezer(&expected.id) else {
                mismatches.push(Mismatch {
                    entity: "freezer",
                    id: expected.id.clone(),
                    reason: "missing".to_string(),
                });
                continue;
            };

            if found.owner != expected.owner {
                mismatches.push(Mismatch {
                    entity: "freezer",
                    id: expected.id.clone(),
                    reason: format!("owner is {:?}, expected {:?}", found.owner, expected.owner),
                });
            }

            if found.model != expected.model {
                mismatches.push(Mismatch {
                    entity: "freezer",
                    id: expected.id.clone(),
                    reason: format!(
                        "model is {} ({}), expected {} ({})",
                        found.model.name, found.model.year, expected.model.name, expected.model.year
                    ),
                });
            }

            if found.sorted_products() != expected.sorted_products() {
                mismatches.push(Mismatch {
                    entity: "freezer",
                    id: expected.id.clone(),
                    reason: "stock differs".to_string(),
                });
            }
        }

        if !mismatches.is_empty() {
            return Err(SeedError::Mismatch { mismatches });
        }

        validate_fixture(&stored)?;

        let report = VerifyReport {
            products: stored.products.len(),
            freezers: stored.freezers.len(),
            stock_entries: stored.stock_entry_count(),
        };
        info!(
            products = report.products,
            freezers = report.freezers,
            stock_entries = report.stock_entries,
            "Stored data verified"
        );

        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
