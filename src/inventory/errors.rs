//! Inventory error types
//!
//! - `NotFound`: referenced id has no row
//! - `DuplicateSku`: sku collision on create or update
//! - `Validation`: malformed or mistyped input, detected before storage
//! - `Storage`: anything else the database reports; fails the request only
//! - `Worker`: the blocking task running a unit of work died

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// One offending field of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field name, or `$root`/`$body` for the request as a whole
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// What was found instead
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

fn join_details(details: &[ValidationDetails]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Inventory errors
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Product not found")]
    NotFound,

    #[error("SKU already exists")]
    DuplicateSku,

    #[error("Validation failed: {}", join_details(.0))]
    Validation(Vec<ValidationDetails>),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl InventoryError {
    /// Single-field validation failure
    pub fn invalid(details: ValidationDetails) -> Self {
        InventoryError::Validation(vec![details])
    }

    /// Expected outcomes are surfaced to the caller; storage errors are faults.
    pub fn is_fault(&self) -> bool {
        matches!(self, InventoryError::Storage(_) | InventoryError::Worker(_))
    }

    /// Field-level detail for validation failures, empty otherwise
    pub fn details(&self) -> &[ValidationDetails] {
        match self {
            InventoryError::Validation(details) => details,
            _ => &[],
        }
    }
}
