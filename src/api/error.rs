// ==========================================
// Resource Planner - API error type
// ==========================================
// Converts domain / engine / repository errors into caller-facing ones.
// Every rejection keeps the figures that caused it.
// ==========================================

use crate::domain::error::DomainError;
use crate::engine::error::EngineError;
use crate::engine::resolver::Rejection;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Allocation rules
    // ==========================================
    /// Hard-capacity breach; echoes the resolver's reason
    #[error("allocation rejected: {0}")]
    Rejected(Rejection),

    #[error("duplicate assignment: {0}")]
    DuplicateAssignment(String),

    #[error("cyclic reporting hierarchy: employee={employee_id}, manager={manager_id}")]
    CyclicHierarchy {
        employee_id: String,
        manager_id: String,
    },

    #[error("duplicate project code: {0}")]
    DuplicateProjectCode(String),

    // ==========================================
    // Input / lookup
    // ==========================================
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ==========================================
    // Outbound / storage
    // ==========================================
    /// The event sink refused the change; the ledger was not touched
    #[error("event publish failed, change not applied: {0}")]
    PublishFailed(anyhow::Error),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("validation failed: {0}")]
    ValidationError(String),

    // ==========================================
    // Misc
    // ==========================================
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::CapacityExceeded(rejection) => ApiError::Rejected(rejection),
            EngineError::DuplicateAssignment(id) => ApiError::DuplicateAssignment(id),
            EngineError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            EngineError::CyclicHierarchy {
                employee_id,
                manager_id,
            } => ApiError::CyclicHierarchy {
                employee_id,
                manager_id,
            },
            EngineError::DuplicateProjectCode(code) => ApiError::DuplicateProjectCode(code),
            EngineError::LockPoisoned(msg) => {
                ApiError::InternalError(format!("state lock poisoned: {}", msg))
            }
            EngineError::Domain(err) => err.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("database lock unavailable: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ValidationError(format!("unique constraint violated: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ValidationError(format!("foreign key violated: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
