//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Unit lookup, ledger input, catalog data        │
//! │  └── ValidationError  - Step-level field validation failures           │
//! │                                                                         │
//! │  tally-capture errors (separate crate)                                 │
//! │  └── CaptureError     - Wizard transitions, routing, config            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CaptureError → app shell          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure here is local and recoverable: the user corrects the input
//! and retries. A below-cost sale is NOT an error, it is a flag on
//! `DerivedFigures`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A unit type that is neither the item's bulk unit nor one of its
    /// declared retail units.
    ///
    /// ## When This Occurs
    /// Only when the UI offers a unit the selected item does not carry.
    /// A correctly wired unit picker never triggers it.
    #[error("Unknown unit '{unit}' for item {item}")]
    UnknownUnit { item: String, unit: String },

    /// Negative (or overflowing) numeric input to the ledger calculator.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Catalog data violates a stock item invariant (e.g. `units_per_bulk <= 0`).
    #[error("Invalid stock item {item}: {reason}")]
    InvalidStockItem { item: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidInput`].
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the capture steps before the wizard is allowed to advance.
/// The display text is what the user sees inline under the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be strictly greater than zero.
    #[error("{field} must be > 0")]
    MustBePositive { field: String },

    /// Invalid format (e.g., letters in an amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A fixed-length digit code was only partly entered.
    #[error("{field} must be {expected} digits, got {actual}")]
    IncompleteCode {
        field: String,
        expected: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// The name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::IncompleteCode { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
