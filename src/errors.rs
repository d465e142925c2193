use sea_orm::error::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Unified error type for all service operations.
///
/// Business-rule failures surface as `ValidationError` (or one of its more
/// specific siblings below); infrastructure failures are wrapped in
/// `DatabaseError` and propagate to the caller unchanged. Every failure is
/// reported once — nothing is retried.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(Uuid),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }

    /// True when the failure is a business-rule rejection rather than an
    /// infrastructure fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidOperation(_)
                | Self::InvalidStatus(_)
                | Self::InsufficientStock(_)
                | Self::Conflict(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_error_normalizes_strings() {
        let err = ServiceError::db_error("connection reset");
        assert!(matches!(err, ServiceError::DatabaseError(DbErr::Custom(_))));
    }

    #[test]
    fn validation_classification() {
        assert!(ServiceError::InsufficientStock("x".into()).is_validation());
        assert!(!ServiceError::NotFound("article".into()).is_validation());
    }
}
