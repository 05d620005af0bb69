//! # Error Types
//!
//! Domain-specific error types for frappe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  frappe-core errors (this file)                                        │
//! │  ├── CoreError        - Request-level failures (bad id, bad page, ...) │
//! │  └── ValidationError  - One field's problem                            │
//! │                                                                         │
//! │  frappe-db errors (separate crate)                                     │
//! │  └── DbError          - Translated driver errors                       │
//! │                                                                         │
//! │  frappe-service errors                                                  │
//! │  └── ServiceError     - What callers of the services see               │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CoreError → ServiceError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::validation::FieldErrors;

// =============================================================================
// Core Error
// =============================================================================

/// Failures detected before any SQL is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An identifier did not parse as an integer.
    ///
    /// ## When This Occurs
    /// - `"abc"` passed as a path id
    /// - Empty string
    /// - Value out of `i64` range
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    /// One or more required fields are missing or malformed.
    ///
    /// The map carries every offending field, not just the first one.
    #[error("missing or invalid fields: {0}")]
    MissingFields(FieldErrors),

    /// The leftovers listing was asked to sort by a column outside the
    /// whitelist.
    #[error("cannot sort by {value:?}, expected one of: {}", allowed.join(", "))]
    InvalidSortColumn {
        value: String,
        allowed: Vec<String>,
    },

    /// A pagination parameter is not a positive integer or is out of range.
    #[error("{field} must be an integer between 1 and {max}, got {value:?}")]
    InvalidPageParameter {
        field: String,
        value: String,
        max: u32,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field validation failure.
///
/// Validators collect these into a [`FieldErrors`] map keyed by
/// [`ValidationError::field`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. blank label inside a list).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// The same value appears twice where it must be unique.
    #[error("{field} '{value}' is listed more than once")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Name of the field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
