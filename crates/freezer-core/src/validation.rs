//! # Validation Module
//!
//! Fixture integrity checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shape of the fixture document                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Every referenced product exists                                   │
//! │  ├── Ids are unique, quantities non-negative                           │
//! │  └── One stock entry per (freezer, product)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY / UNIQUE index                                        │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  └── FOREIGN KEY freezer_stock.product_id → products.id                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use freezer_core::validation::validate_fixture;
//! use freezer_core::Fixture;
//!
//! let fixture = Fixture::builtin();
//! assert!(validate_fixture(&fixture).is_ok());
//! ```

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Fixture, Freezer, Product};
use crate::{MAX_IDENTIFIER_LEN, MAX_MODEL_YEAR, MIN_MODEL_YEAR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an identifier (product id, freezer id).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_IDENTIFIER_LEN`] characters
///
/// Inner spaces and non-ASCII letters are allowed: `"minced meat"` and
/// `"ATLANT М 7184-003"` are both real ids.
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    Ok(())
}

/// Validates a quantity. Zero is allowed.
///
/// ```rust
/// use freezer_core::validation::validate_quantity;
///
/// assert!(validate_quantity("quantity", 0).is_ok());
/// assert!(validate_quantity("quantity", -3).is_err());
/// ```
pub fn validate_quantity(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a freezer model year.
pub fn validate_model_year(year: i32) -> ValidationResult<()> {
    if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "model year".to_string(),
            min: MIN_MODEL_YEAR as i64,
            max: MAX_MODEL_YEAR as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a catalog product on its own.
pub fn validate_product(product: &Product) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    push_err(&mut issues, validate_identifier("product id", &product.id));
    push_err(
        &mut issues,
        validate_quantity(&format!("default of '{}'", product.id), product.default_stock),
    );

    issues
}

/// Validates a freezer on its own (no catalog lookups).
pub fn validate_freezer(freezer: &Freezer) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    push_err(&mut issues, validate_identifier("freezer id", &freezer.id));
    push_err(&mut issues, validate_identifier("model name", &freezer.model.name));
    push_err(&mut issues, validate_model_year(freezer.model.year));

    let mut seen = HashSet::new();
    for entry in &freezer.products {
        push_err(&mut issues, validate_identifier("stock product id", &entry.product_id));
        push_err(
            &mut issues,
            validate_quantity(
                &format!("quantity of '{}' in '{}'", entry.product_id, freezer.id),
                entry.quantity,
            ),
        );

        if !seen.insert(entry.product_id.as_str()) {
            issues.push(ValidationError::Duplicate {
                field: format!("stock entry of '{}'", freezer.id),
                value: entry.product_id.clone(),
            });
        }
    }

    issues
}

// =============================================================================
// Fixture Validator
// =============================================================================

/// Checks every integrity rule over a whole fixture.
///
/// ## Rules
/// 1. Every product id referenced inside a freezer exists in the catalog
/// 2. Freezer ids are unique; product ids are unique
/// 3. All quantities are non-negative
/// 4. A freezer lists each product at most once
///
/// All problems are collected into [`CoreError::InvalidFixture`].
pub fn validate_fixture(fixture: &Fixture) -> CoreResult<()> {
    let issues = fixture_issues(fixture);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFixture { issues })
    }
}

/// Same checks as [`validate_fixture`], returning the raw list.
pub fn fixture_issues(fixture: &Fixture) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    let mut catalog = HashSet::new();
    for product in &fixture.products {
        issues.extend(validate_product(product));

        if !catalog.insert(product.id.as_str()) {
            issues.push(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id.clone(),
            });
        }
    }

    let mut freezer_ids = HashSet::new();
    for freezer in &fixture.freezers {
        issues.extend(validate_freezer(freezer));

        if !freezer_ids.insert(freezer.id.as_str()) {
            issues.push(ValidationError::Duplicate {
                field: "freezer id".to_string(),
                value: freezer.id.clone(),
            });
        }

        for entry in &freezer.products {
            if !catalog.contains(entry.product_id.as_str()) {
                issues.push(ValidationError::UnknownProduct {
                    freezer: freezer.id.clone(),
                    product: entry.product_id.clone(),
                });
            }
        }
    }

    issues
}

fn push_err(issues: &mut Vec<ValidationError>, result: ValidationResult<()>) {
    if let Err(err) = result {
        issues.push(err);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FreezerModel, StockEntry};

    fn freezer(id: &str, stock: Vec<StockEntry>) -> Freezer {
        Freezer {
            id: id.to_string(),
            owner: None,
            model: FreezerModel {
                name: "Lol".to_string(),
                year: 2010,
            },
            products: stock,
        }
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("product id", "minced meat").is_ok());
        assert!(validate_identifier("freezer id", "ATLANT М 7184-003").is_ok());

        assert!(validate_identifier("product id", "").is_err());
        assert!(validate_identifier("product id", "   ").is_err());
        assert!(validate_identifier("product id", &"x".repeat(MAX_IDENTIFIER_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", 0).is_ok());
        assert!(validate_quantity("quantity", 220).is_ok());
        assert_eq!(
            validate_quantity("quantity", -1),
            Err(ValidationError::Negative {
                field: "quantity".to_string(),
                value: -1
            })
        );
    }

    #[test]
    fn test_validate_model_year() {
        assert!(validate_model_year(2012).is_ok());
        assert!(validate_model_year(1899).is_err());
        assert!(validate_model_year(2101).is_err());
    }

    #[test]
    fn test_builtin_fixture_is_valid() {
        assert!(validate_fixture(&Fixture::builtin()).is_ok());
    }

    #[test]
    fn test_unknown_product_reference() {
        let fixture = Fixture {
            products: vec![Product::new("ice", 20)],
            freezers: vec![freezer(
                "Horizont M2",
                vec![StockEntry::new("ice", 1), StockEntry::new("pelmeni", 3)],
            )],
        };

        let issues = fixture_issues(&fixture);
        assert_eq!(
            issues,
            vec![ValidationError::UnknownProduct {
                freezer: "Horizont M2".to_string(),
                product: "pelmeni".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let fixture = Fixture {
            products: vec![Product::new("ice", 20), Product::new("ice", 3)],
            freezers: vec![freezer("Horizont M2", vec![]), freezer("Horizont M2", vec![])],
        };

        let issues = fixture_issues(&fixture);
        assert!(issues.contains(&ValidationError::Duplicate {
            field: "product id".to_string(),
            value: "ice".to_string(),
        }));
        assert!(issues.contains(&ValidationError::Duplicate {
            field: "freezer id".to_string(),
            value: "Horizont M2".to_string(),
        }));
    }

    #[test]
    fn test_duplicate_stock_entry_in_one_freezer() {
        let fixture = Fixture {
            products: vec![Product::new("ice", 20)],
            freezers: vec![freezer(
                "Horizont M2",
                vec![StockEntry::new("ice", 1), StockEntry::new("ice", 2)],
            )],
        };

        let issues = fixture_issues(&fixture);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_repeated_key_in_legacy_map_is_duplicate() {
        let fixture = Fixture::from_json_str(
            r#"{
                "products": [{ "_id": "ice", "default": 20 }],
                "freezers": [{
                    "_id": "Horizont M2",
                    "products": { "ice": 1, "ice": 2 },
                    "model": { "name": "Lol", "year": 2010 }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(
            fixture_issues(&fixture),
            vec![ValidationError::Duplicate {
                field: "stock entry of 'Horizont M2'".to_string(),
                value: "ice".to_string(),
            }]
        );
    }

    #[test]
    fn test_negative_quantities_are_collected() {
        let fixture = Fixture {
            products: vec![Product::new("ice", -20)],
            freezers: vec![freezer("Horizont M2", vec![StockEntry::new("ice", -1)])],
        };

        let err = validate_fixture(&fixture).unwrap_err();
        let negatives = err
            .issues()
            .iter()
            .filter(|issue| matches!(issue, ValidationError::Negative { .. }))
            .count();
        assert_eq!(negatives, 2);
    }

    #[test]
    fn test_empty_fixture_is_valid() {
        assert!(validate_fixture(&Fixture::default()).is_ok());
    }
}
