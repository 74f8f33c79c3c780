// ==========================================
// Resource Planner - project assignment
// ==========================================
// An employee staffed on a project in a role for a window,
// consuming a share of capacity under a lock type.
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::interval::CalendarInterval;
use crate::domain::types::LockType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a single assignment's utilization.
pub const MAX_UTILIZATION_PCT: u32 = 100;

// ==========================================
// Utilization - share of capacity (0..=100)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Utilization(u8);

impl Utilization {
    pub fn new(pct: u32) -> DomainResult<Self> {
        if pct > MAX_UTILIZATION_PCT {
            return Err(DomainError::InvalidUtilization(pct));
        }
        Ok(Self(pct as u8))
    }

    pub fn pct(&self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u32> for Utilization {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Utilization::new(value)
    }
}

impl From<Utilization> for u32 {
    fn from(value: Utilization) -> Self {
        value.pct()
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ==========================================
// AssignmentDraft - proposed assignment
// ==========================================
// Shape of a persisted Assignment minus identifier and timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub employee_id: String,
    pub project_id: String,
    pub role_id: String,
    pub interval: CalendarInterval,
    pub utilization: Utilization,
    pub lock_type: LockType,
}

impl AssignmentDraft {
    pub fn new(
        employee_id: impl Into<String>,
        project_id: impl Into<String>,
        role_id: impl Into<String>,
        interval: CalendarInterval,
        utilization: Utilization,
        lock_type: LockType,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            role_id: role_id.into(),
            interval,
            utilization,
            lock_type,
        }
    }

    pub fn with_lock_type(mut self, lock_type: LockType) -> Self {
        self.lock_type = lock_type;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        crate::domain::error::require_text("employee_id", &self.employee_id)?;
        crate::domain::error::require_text("project_id", &self.project_id)?;
        crate::domain::error::require_text("role_id", &self.role_id)?;
        Ok(())
    }
}

// ==========================================
// Assignment - committed allocation
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: String,
    pub employee_id: String,
    pub project_id: String,
    pub role_id: String,
    pub interval: CalendarInterval,
    pub utilization: Utilization,
    pub lock_type: LockType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn from_draft(assignment_id: impl Into<String>, draft: AssignmentDraft) -> Self {
        let now = Utc::now();
        Self {
            assignment_id: assignment_id.into(),
            employee_id: draft.employee_id,
            project_id: draft.project_id,
            role_id: draft.role_id,
            interval: draft.interval,
            utilization: draft.utilization,
            lock_type: draft.lock_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Draft carrying this assignment's current values.
    pub fn to_draft(&self) -> AssignmentDraft {
        AssignmentDraft {
            employee_id: self.employee_id.clone(),
            project_id: self.project_id.clone(),
            role_id: self.role_id.clone(),
            interval: self.interval,
            utilization: self.utilization,
            lock_type: self.lock_type,
        }
    }

    pub fn is_hard(&self) -> bool {
        self.lock_type.is_hard()
    }
}
