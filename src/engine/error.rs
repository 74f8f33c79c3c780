// ==========================================
// Resource Planner - engine error type
// ==========================================

use crate::domain::error::DomainError;
use crate::engine::resolver::Rejection;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("duplicate assignment: id={0}")]
    DuplicateAssignment(String),

    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(Rejection),

    #[error("cyclic reporting hierarchy: employee={employee_id}, manager={manager_id}")]
    CyclicHierarchy {
        employee_id: String,
        manager_id: String,
    },

    #[error("duplicate project code: {0}")]
    DuplicateProjectCode(String),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EngineError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
