// ==========================================
// Resource Planner - allocation events
// ==========================================
// The engine defines the publisher trait; persistence / cache
// invalidation adapters implement it outside the engine.
// ==========================================

use crate::domain::assignment::Assignment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationEventKind {
    /// New assignment accepted into the ledger
    Committed,
    /// Assignment removed from the ledger
    Released,
    /// Lock type changed in place
    LockChanged,
    /// Assignment edited (window, utilization, references)
    Updated,
}

impl AllocationEventKind {
    pub fn as_str(&self) -> &str {
        match self {
            AllocationEventKind::Committed => "Committed",
            AllocationEventKind::Released => "Released",
            AllocationEventKind::LockChanged => "LockChanged",
            AllocationEventKind::Updated => "Updated",
        }
    }
}

/// Outbound notification of a ledger change.
///
/// `assignment` carries the new state; it is `None` for `Released`,
/// where only the identifier leaves the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEvent {
    pub kind: AllocationEventKind,
    pub assignment_id: String,
    pub employee_id: String,
    pub assignment: Option<Assignment>,
}

impl AllocationEvent {
    pub fn with_assignment(kind: AllocationEventKind, assignment: &Assignment) -> Self {
        Self {
            kind,
            assignment_id: assignment.assignment_id.clone(),
            employee_id: assignment.employee_id.clone(),
            assignment: Some(assignment.clone()),
        }
    }

    pub fn released(assignment: &Assignment) -> Self {
        Self {
            kind: AllocationEventKind::Released,
            assignment_id: assignment.assignment_id.clone(),
            employee_id: assignment.employee_id.clone(),
            assignment: None,
        }
    }
}

// ==========================================
// Publisher trait
// ==========================================

/// Receives allocation events before the ledger changes.
///
/// An `Err` cancels the change.
pub trait AllocationEventPublisher: Send + Sync {
    fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Publisher that drops every event (unit tests, dry runs).
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl AllocationEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: skipping event - assignment_id={}, kind={}",
            event.assignment_id,
            event.kind.as_str()
        );
        Ok(())
    }
}

/// Wraps `Option<Arc<dyn AllocationEventPublisher>>`.
#[derive(Clone)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn AllocationEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn AllocationEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    "OptionalEventPublisher: no publisher configured - assignment_id={}, kind={}",
                    event.assignment_id,
                    event.kind.as_str()
                );
                Ok(())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Option<Arc<dyn AllocationEventPublisher>>> for OptionalEventPublisher {
    fn from(inner: Option<Arc<dyn AllocationEventPublisher>>) -> Self {
        Self { inner }
    }
}
