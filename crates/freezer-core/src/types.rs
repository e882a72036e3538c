//! # Domain Types
//!
//! Core domain types used throughout the freezer seeder.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │    Product      │   │       Freezer        │   │  FreezerModel   │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id (key)       │◄──│  id (key)            │──►│  name           │  │
//! │  │  default_stock  │   │  owner               │   │  year           │  │
//! │  └─────────────────┘   │  products: Vec<      │   └─────────────────┘  │
//! │                        │    StockEntry {      │                        │
//! │                        │      product_id,     │                        │
//! │                        │      quantity } >    │                        │
//! │                        └──────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Shape
//! Older fixture documents store a freezer's stock as a map
//! `{ "ice": 5 }`. The stored shape is a list of `{ product_id, quantity }`
//! entries so that `(freezer id, product id)` can carry a unique index.
//! Both shapes deserialize into [`StockEntry`] lists.

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A named good with a default/target stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g. `"mapo-tofu"`).
    #[serde(alias = "_id")]
    pub id: String,

    /// Default/target quantity kept in stock.
    #[serde(rename = "default")]
    pub default_stock: i64,
}

impl Product {
    /// Creates a product.
    pub fn new(id: impl Into<String>, default_stock: i64) -> Self {
        Product {
            id: id.into(),
            default_stock,
        }
    }
}

// =============================================================================
// Freezer Model
// =============================================================================

/// Model descriptor of a freezer unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezerModel {
    pub name: String,
    pub year: i32,
}

// =============================================================================
// Stock Entry
// =============================================================================

/// Quantity of one product stored in one freezer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub product_id: String,
    pub quantity: i64,
}

impl StockEntry {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        StockEntry {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Freezer
// =============================================================================

/// A physical storage unit with an owner, a model and its stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freezer {
    /// Unique freezer identifier (brand + model string).
    #[serde(alias = "_id")]
    pub id: String,

    /// Free-text owner.
    #[serde(default)]
    pub owner: Option<String>,

    pub model: FreezerModel,

    /// Stock entries, at most one per product.
    #[serde(default, deserialize_with = "deserialize_stock")]
    pub products: Vec<StockEntry>,
}

impl Freezer {
    /// Returns the stored quantity of a product, if the freezer holds it.
    pub fn quantity_of(&self, product_id: &str) -> Option<i64> {
        self.products
            .iter()
            .find(|entry| entry.product_id == product_id)
            .map(|entry| entry.quantity)
    }

    /// Sum of all stored quantities.
    pub fn total_units(&self) -> i64 {
        self.products.iter().map(|entry| entry.quantity).sum()
    }

    /// Returns the stock entries sorted by product id.
    pub fn sorted_products(&self) -> Vec<StockEntry> {
        let mut entries = self.products.clone();
        entries.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        entries
    }
}

/// Accepts either `[{ "product_id": .., "quantity": .. }]` or the legacy
/// `{ "<product id>": <quantity> }` map.
///
/// Map keys are kept in document order and repeated keys are kept as
/// separate entries, so validation still sees them as duplicates.
fn deserialize_stock<'de, D>(deserializer: D) -> Result<Vec<StockEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StockVisitor;

    impl<'de> Visitor<'de> for StockVisitor {
        type Value = Vec<StockEntry>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of stock entries or a map of product id to quantity")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(entry) = seq.next_element::<StockEntry>()? {
                entries.push(entry);
            }
            Ok(entries)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((product_id, quantity)) = map.next_entry::<String, i64>()? {
                entries.push(StockEntry {
                    product_id,
                    quantity,
                });
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_any(StockVisitor)
}

// =============================================================================
// Fixture
// =============================================================================

/// The full data set loaded by one seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub freezers: Vec<Freezer>,
}

impl Fixture {
    /// Looks up a catalog product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Looks up a freezer by id.
    pub fn freezer(&self, id: &str) -> Option<&Freezer> {
        self.freezers.iter().find(|freezer| freezer.id == id)
    }

    /// Number of stock entries across all freezers.
    pub fn stock_entry_count(&self) -> usize {
        self.freezers.iter().map(|f| f.products.len()).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
