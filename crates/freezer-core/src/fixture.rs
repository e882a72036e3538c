//! # Built-in Fixture
//!
//! The fixed catalog of products and freezers loaded by the `seed` binary
//! when no fixture file is given.
//!
//! ## Contents
//! ```text
//! products                        freezers
//! ──────────────────────          ─────────────────────────────────────────
//! dumplings     default 25        ATLANT М 7184-003     ice 5
//! ice           default 20        Samsung SM93924H3     minced meat 220,
//! icecream      default 1                               icecream 1
//! mapo-tofu     default 7         Horizont M2           dumplings 23
//! minced meat   default 4         ATLANT М3223-R        (empty)
//! chicken       default 2         Panasonic ultra cool  ice 1, chicken 2,
//!                                                       mapo-tofu 4
//! ```

use crate::error::CoreResult;
use crate::types::{Fixture, Freezer, FreezerModel, Product, StockEntry};

/// Catalog: (product id, default stock).
const PRODUCTS: &[(&str, i64)] = &[
    ("dumplings", 25),
    ("ice", 20),
    ("icecream", 1),
    ("mapo-tofu", 7),
    ("minced meat", 4),
    ("chicken", 2),
];

struct FreezerSeed {
    id: &'static str,
    owner: &'static str,
    model: (&'static str, i32),
    products: &'static [(&'static str, i64)],
}

const FREEZERS: &[FreezerSeed] = &[
    FreezerSeed {
        id: "ATLANT М 7184-003",
        owner: "ИП Серегин",
        model: ("Frier", 2012),
        products: &[("ice", 5)],
    },
    FreezerSeed {
        id: "Samsung SM93924H3",
        owner: "ИП Борис",
        model: ("Monster", 2020),
        products: &[("minced meat", 220), ("icecream", 1)],
    },
    FreezerSeed {
        id: "Horizont M2",
        owner: "МС Спринг",
        model: ("Lol", 2010),
        products: &[("dumplings", 23)],
    },
    FreezerSeed {
        id: "ATLANT М3223-R",
        owner: "Кор",
        model: ("Rider", 2011),
        products: &[],
    },
    FreezerSeed {
        id: "Panasonic ultra cool",
        owner: "ИП Борис",
        model: ("Cooler Master", 2022),
        products: &[("ice", 1), ("chicken", 2), ("mapo-tofu", 4)],
    },
];

impl FreezerSeed {
    fn build(&self) -> Freezer {
        Freezer {
            id: self.id.to_string(),
            owner: Some(self.owner.to_string()),
            model: FreezerModel {
                name: self.model.0.to_string(),
                year: self.model.1,
            },
            products: self
                .products
                .iter()
                .map(|(product_id, quantity)| StockEntry::new(*product_id, *quantity))
                .collect(),
        }
    }
}

impl Fixture {
    /// Returns the built-in catalog and freezer set.
    pub fn builtin() -> Self {
        Fixture {
            products: PRODUCTS
                .iter()
                .map(|(id, default_stock)| Product::new(*id, *default_stock))
                .collect(),
            freezers: FREEZERS.iter().map(FreezerSeed::build).collect(),
        }
    }

    /// Parses a fixture document.
    ///
    /// ## Format
    /// ```json
    /// {
    ///   "products": [{ "_id": "ice", "default": 20 }],
    ///   "freezers": [{
    ///     "_id": "Horizont M2",
    ///     "owner": "МС Спринг",
    ///     "products": { "ice": 3 },
    ///     "model": { "name": "Lol", "year": 2010 }
    ///   }]
    /// }
    /// ```
    /// Freezer `products` may also be a list of `{ product_id, quantity }`.
    /// Parsing does not run the integrity checks.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
