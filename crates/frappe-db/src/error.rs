//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Translates constraint failures                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (frappe-service) ← Adds id / validation failures         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Constraint Mapping
//! ```text
//! UNIQUE constraint failed: inventory.name            → Duplicate
//! CHECK constraint failed: inventory_quantity_non_negative → NegativeQuantity
//! CHECK constraint failed: inventory_unit_valid       → InvalidEnum
//! CHECK constraint failed: <other>                    → CheckViolation
//! FOREIGN KEY constraint failed                       → ForeignKeyViolation
//! column "unit" holds unknown text                    → InvalidEnum
//! ```

use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// CHECK constraint guarding `inventory.quantity >= 0`.
pub const QUANTITY_CONSTRAINT: &str = "inventory_quantity_non_negative";

/// CHECK constraint guarding the `inventory.unit` enum text.
pub const UNIT_CONSTRAINT: &str = "inventory_unit_valid";

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Lookup by an id that doesn't exist
    /// - UPDATE or DELETE affected zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting an inventory item whose name already exists
    /// - Renaming a menu item onto an existing name
    #[error("duplicate record: {field} already exists")]
    Duplicate { field: String },

    /// A write would leave an inventory quantity below zero.
    #[error("quantity cannot be negative")]
    NegativeQuantity,

    /// A delta would push an inventory quantity past `i64::MAX`.
    #[error("quantity would overflow")]
    QuantityOverflow,

    /// Text that is not a member of an enumerated column.
    #[error("invalid enum value: {0}")]
    InvalidEnum(String),

    /// Any other CHECK constraint.
    #[error("check constraint failed: {constraint}")]
    CheckViolation { constraint: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Menu ingredient referencing a non-existent inventory item
    /// - Deleting an inventory item still used by a menu item
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, DbError::Duplicate { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → constraint kind + name (see module docs)
/// sqlx::Error::ColumnDecode   → DbError::InvalidEnum for the unit column
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("record", "unknown"),

            sqlx::Error::Database(db_err) => from_database_error(db_err.as_ref()),

            sqlx::Error::ColumnDecode { index, source } => {
                if index.trim_matches('"') == "unit" {
                    DbError::InvalidEnum(source.to_string())
                } else {
                    DbError::Internal(format!("cannot decode column {}: {}", index, source))
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

fn from_database_error(db_err: &dyn DatabaseError) -> DbError {
    let msg = db_err.message();

    // SQLite messages:
    //   "UNIQUE constraint failed: <table>.<column>[, <table>.<column>]"
    //   "CHECK constraint failed: <constraint name>"
    //   "FOREIGN KEY constraint failed"
    match db_err.kind() {
        ErrorKind::UniqueViolation => DbError::Duplicate {
            field: constraint_target(msg, "UNIQUE constraint failed: "),
        },
        ErrorKind::CheckViolation => check_violation(&constraint_target(msg, "CHECK constraint failed: ")),
        ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
            message: msg.to_string(),
        },
        _ if msg.contains("UNIQUE constraint failed") => DbError::Duplicate {
            field: constraint_target(msg, "UNIQUE constraint failed: "),
        },
        _ if msg.contains("CHECK constraint failed") => {
            check_violation(&constraint_target(msg, "CHECK constraint failed: "))
        }
        _ if msg.contains("FOREIGN KEY constraint failed") => DbError::ForeignKeyViolation {
            message: msg.to_string(),
        },
        _ => DbError::QueryFailed(msg.to_string()),
    }
}

fn check_violation(constraint: &str) -> DbError {
    match constraint {
        QUANTITY_CONSTRAINT => DbError::NegativeQuantity,
        UNIT_CONSTRAINT => DbError::InvalidEnum("unit".to_string()),
        _ => DbError::CheckViolation {
            constraint: constraint.to_string(),
        },
    }
}

fn constraint_target(msg: &str, prefix: &str) -> String {
    msg.split(prefix)
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_violation_by_constraint_name() {
        assert!(matches!(check_violation(QUANTITY_CONSTRAINT), DbError::NegativeQuantity));
        assert!(matches!(check_violation(UNIT_CONSTRAINT), DbError::InvalidEnum(_)));
        assert!(matches!(
            check_violation("menu_items_price_non_negative"),
            DbError::CheckViolation { ref constraint } if constraint == "menu_items_price_non_negative"
        ));
    }

    #[test]
    fn test_constraint_target() {
        assert_eq!(
            constraint_target("UNIQUE constraint failed: inventory.name", "UNIQUE constraint failed: "),
            "inventory.name"
        );
        assert_eq!(constraint_target("something else", "UNIQUE constraint failed: "), "unknown");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }
}
