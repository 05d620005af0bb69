//! # Service Error Type
//!
//! Unified error type for service operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Frappuccino                            │
//! │                                                                         │
//! │  service.update("abc", input)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  parse_id fails?     ──── CoreError::InvalidId ──────┐                 │
//! │         │                                            │                 │
//! │         ▼                                            ▼                 │
//! │  validator fails?    ──── FieldErrors ──────────► ServiceError         │
//! │         │                                            ▲                 │
//! │         ▼                                            │                 │
//! │  repository fails?   ──── DbError ───────────────────┘                 │
//! │                                                                         │
//! │  ServiceError::code() ──► NOT_FOUND | INVALID_ID | VALIDATION_ERROR    │
//! │                           | CONFLICT | DATABASE_ERROR                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use frappe_core::{CoreError, FieldErrors};
use frappe_db::DbError;

/// Errors returned by [`InventoryService`](crate::InventoryService) and
/// [`MenuService`](crate::MenuService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The identifier was not an integer. No SQL was issued.
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    /// Input failed validation. No SQL was issued.
    #[error("missing or invalid fields: {0}")]
    MissingFields(FieldErrors),

    /// Query parameters (sort column, page, page size) were rejected.
    #[error("invalid query: {0}")]
    InvalidQuery(CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidId(raw) => ServiceError::InvalidId(raw),
            CoreError::MissingFields(fields) => ServiceError::MissingFields(fields),
            other => ServiceError::InvalidQuery(other),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(fields: FieldErrors) -> Self {
        ServiceError::MissingFields(fields)
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record does not exist (404)
    NotFound,

    /// Identifier is not an integer (400)
    InvalidId,

    /// Input or query validation failed (400)
    ValidationError,

    /// Unique or reference conflict (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,
}

impl ServiceError {
    /// Maps the error onto an [`ErrorCode`].
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::InvalidId(_) => ErrorCode::InvalidId,
            ServiceError::MissingFields(_) | ServiceError::InvalidQuery(_) => {
                ErrorCode::ValidationError
            }
            ServiceError::Db(db) => match db {
                DbError::NotFound { .. } => ErrorCode::NotFound,
                DbError::Duplicate { .. } | DbError::ForeignKeyViolation { .. } => {
                    ErrorCode::Conflict
                }
                DbError::NegativeQuantity
                | DbError::QuantityOverflow
                | DbError::InvalidEnum(_)
                | DbError::CheckViolation { .. } => ErrorCode::ValidationError,
                DbError::ConnectionFailed(_)
                | DbError::MigrationFailed(_)
                | DbError::QueryFailed(_)
                | DbError::PoolExhausted
                | DbError::Internal(_) => ErrorCode::DatabaseError,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }

    /// Builds the body an outer surface would send back.
    ///
    /// Database internals are logged here and replaced with a generic
    /// message.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self.code() {
            ErrorCode::DatabaseError => {
                tracing::error!(error = %self, "Database operation failed");
                "Database operation failed".to_string()
            }
            _ => self.to_string(),
        };

        let fields = match self {
            ServiceError::MissingFields(fields) => Some(fields.clone()),
            _ => None,
        };

        ErrorBody {
            code: self.code(),
            message,
            fields,
        }
    }
}

/// Serializable error payload.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "missing or invalid fields: name: name is required",
///   "fields": { "name": "name is required" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use frappe_core::ValidationError;

    #[test]
    fn test_core_errors_split_by_kind() {
        let err: ServiceError = CoreError::InvalidId("abc".to_string()).into();
        assert!(matches!(err, ServiceError::InvalidId(ref raw) if raw == "abc"));
        assert_eq!(err.code(), ErrorCode::InvalidId);

        let err: ServiceError = CoreError::InvalidSortColumn {
            value: "price".to_string(),
            allowed: vec!["quantity".to_string(), "name".to_string()],
        }
        .into();
        assert!(matches!(err, ServiceError::InvalidQuery(_)));
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_db_error_codes() {
        let not_found = ServiceError::from(DbError::not_found("Inventory item", 9));
        assert!(not_found.is_not_found());

        let dup = ServiceError::from(DbError::Duplicate {
            field: "inventory.name".to_string(),
        });
        assert_eq!(dup.code(), ErrorCode::Conflict);

        assert_eq!(
            ServiceError::from(DbError::NegativeQuantity).code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            ServiceError::from(DbError::PoolExhausted).code(),
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn test_body_carries_field_map() {
        let mut fields = FieldErrors::new();
        fields.push(ValidationError::Required {
            field: "name".to_string(),
        });

        let body = ServiceError::from(fields).to_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["fields"]["name"], "name is required");
    }

    #[test]
    fn test_body_hides_database_details() {
        let body = ServiceError::from(DbError::Internal("disk I/O error at page 7".to_string())).to_body();

        assert_eq!(body.code, ErrorCode::DatabaseError);
        assert_eq!(body.message, "Database operation failed");
        assert!(body.fields.is_none());
    }
}
