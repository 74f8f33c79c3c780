// ==========================================
// Resource Planner - domain validation errors
// ==========================================
// Raised while constructing entities and value objects
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid range: start={start} is after end={end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("utilization must be within 0..=100, got {0}")]
    InvalidUtilization(u32),

    #[error("completion percentage must be within 0..=100, got {0}")]
    InvalidCompletion(u32),

    #[error("number of openings must be at least 1, got {0}")]
    InvalidOpenings(u32),

    #[error("required field is empty: {0}")]
    MissingField(&'static str),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejects blank strings for required text fields.
pub(crate) fn require_text(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::MissingField(field))
    } else {
        Ok(())
    }
}
