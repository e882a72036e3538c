//! # freezer-db: Database Layer for the Freezer Seeder
//!
//! This crate stores the product catalog and freezer inventory in SQLite
//! and loads fixtures into it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Freezer Seeder Data Flow                         │
//! │                                                                         │
//! │  seed binary (src/bin/seed.rs)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    freezer-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │               │◄───│ FreezerRepo   │    │ 002_unique   │  │   │
//! │  │   │ SqlitePool    │    │ SeedRunRepo   │    │   _index     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │            ▲                                                    │   │
//! │  │            │   Seeder (seeder.rs): validate → load → verify     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`seeder`] - Transactional fixture load and read-back verification
//! - [`config`] - Environment configuration for the `seed` binary
//!
//! ## Usage
//!
//! ```rust,ignore
//! use freezer_core::Fixture;
//! use freezer_db::{ConflictPolicy, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("freezer.db")).await?;
//! let summary = db
//!     .seeder()
//!     .load(&Fixture::builtin(), ConflictPolicy::Skip, "builtin")
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seeder;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, LogFormat, SeedConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use seeder::{ConflictPolicy, SeedError, SeedSummary, Seeder, VerifyReport};

// Repository re-exports for convenience
pub use repository::freezer::FreezerRepository;
pub use repository::product::ProductRepository;
pub use repository::seed_run::{SeedRun, SeedRunRepository};
