//! # Error Types
//!
//! Domain-specific error types for freezer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  freezer-core errors (this file)                                       │
//! │  ├── CoreError        - Fixture parse / integrity failures             │
//! │  └── ValidationError  - One broken rule on one field                   │
//! │                                                                         │
//! │  freezer-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── SeedError        - CoreError | DbError during a load              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SeedError → seed binary (anyhow)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (freezer id, product id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Fixture-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The fixture broke one or more integrity rules.
    ///
    /// ## When This Occurs
    /// - A freezer references a product missing from the catalog
    /// - Two freezers (or two products) share an id
    /// - A quantity is negative
    ///
    /// Every problem found is listed, not only the first one.
    #[error("Fixture is invalid ({} problem(s)): {}", .issues.len(), join_issues(.issues))]
    InvalidFixture { issues: Vec<ValidationError> },

    /// Fixture text is not a valid fixture document.
    #[error("Fixture could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Single validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the individual problems behind this error.
    pub fn issues(&self) -> &[ValidationError] {
        match self {
            CoreError::InvalidFixture { issues } => issues,
            CoreError::Validation(issue) => std::slice::from_ref(issue),
            CoreError::Parse(_) => &[],
        }
    }
}

fn join_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Quantity below zero.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (freezer id, product id, or stock entry).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// A freezer stocks a product the catalog does not know.
    #[error("freezer '{freezer}' references unknown product '{product}'")]
    UnknownProduct { freezer: String, product: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product id".to_string(),
        };
        assert_eq!(err.to_string(), "product id is required");

        let err = ValidationError::UnknownProduct {
            freezer: "Horizont M2".to_string(),
            product: "pelmeni".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "freezer 'Horizont M2' references unknown product 'pelmeni'"
        );
    }

    #[test]
    fn test_invalid_fixture_lists_every_issue() {
        let err = CoreError::InvalidFixture {
            issues: vec![
                ValidationError::Negative {
                    field: "quantity".to_string(),
                    value: -1,
                },
                ValidationError::Duplicate {
                    field: "freezer id".to_string(),
                    value: "Horizont M2".to_string(),
                },
            ],
        };

        assert_eq!(err.issues().len(), 2);
        assert_eq!(
            err.to_string(),
            "Fixture is invalid (2 problem(s)): quantity must not be negative (got -1); \
             freezer id 'Horizont M2' appears more than once"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "owner".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.issues().len(), 1);
    }
}
