//! # freezer-core: Pure Domain Model for the Freezer Seeder
//!
//! This crate holds the product catalog, the freezer documents and the
//! integrity rules a fixture must satisfy before it is loaded. It has zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Freezer Seeder Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    seed binary (freezer-db)                     │   │
//! │  │        config ──► fixture ──► validate ──► load ──► verify      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ freezer-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐                 │   │
//! │  │   │   types   │  │  fixture  │  │ validation │                 │   │
//! │  │   │  Product  │  │  builtin  │  │  integrity │                 │   │
//! │  │   │  Freezer  │  │  JSON     │  │  checks    │                 │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 freezer-db (Database Layer)                     │   │
//! │  │        SQLite schema, uniqueness index, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Freezer, StockEntry, Fixture)
//! - [`fixture`] - The built-in data set and JSON parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Fixture integrity checks
//!
//! ## Example Usage
//!
//! ```rust
//! use freezer_core::{validation::validate_fixture, Fixture};
//!
//! let fixture = Fixture::builtin();
//! validate_fixture(&fixture).unwrap();
//!
//! let samsung = fixture.freezer("Samsung SM93924H3").unwrap();
//! assert_eq!(samsung.quantity_of("minced meat"), Some(220));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixture;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of product and freezer identifiers, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 200;

/// Oldest accepted freezer model year.
pub const MIN_MODEL_YEAR: i32 = 1900;

/// Newest accepted freezer model year.
pub const MAX_MODEL_YEAR: i32 = 2100;
