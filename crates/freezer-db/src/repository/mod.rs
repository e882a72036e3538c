//! # Repository Module
//!
//! Database repository implementations for the freezer store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Seeder / seed binary                                                  │
//! │       │                                                                 │
//! │       │  db.freezers().get_by_id("Horizont M2")                        │
//! │       ▼                                                                 │
//! │  FreezerRepository                                                     │
//! │  ├── insert(&self, freezer)                                            │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list(&self) / list_ids(&self, limit, offset)                      │
//! │  └── count(&self) / stock_count(&self)                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository also exposes a crate-private `insert_on` / `record_on`
//! taking a bare connection, so the seeder can run every write inside one
//! transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product catalog
//! - [`FreezerRepository`](freezer::FreezerRepository) - Freezers and stock
//! - [`SeedRunRepository`](seed_run::SeedRunRepository) - Load history

pub mod freezer;
pub mod product;
pub mod seed_run;
