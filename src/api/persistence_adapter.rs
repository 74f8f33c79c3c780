// ==========================================
// Resource Planner - persistence adapter
// ==========================================
// Writes allocation events through to SQLite.
// Plugged into AllocationApi as its event publisher; a write failure
// comes back as PublishFailed and the ledger change is not applied.
// ==========================================

use crate::engine::events::{AllocationEvent, AllocationEventKind, AllocationEventPublisher};
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::error::RepositoryError;
use std::error::Error;
use std::sync::Arc;

pub struct RepositoryEventPublisher {
    repo: Arc<AssignmentRepository>,
}

impl RepositoryEventPublisher {
    pub fn new(repo: Arc<AssignmentRepository>) -> Self {
        Self { repo }
    }

    fn apply(&self, event: &AllocationEvent) -> Result<(), RepositoryError> {
        match (event.kind, event.assignment.as_ref()) {
            (AllocationEventKind::Released, _) => self.repo.delete(&event.assignment_id),
            (AllocationEventKind::Committed, Some(assignment)) => self.repo.insert(assignment),
            (AllocationEventKind::LockChanged | AllocationEventKind::Updated, Some(assignment)) => {
                self.repo.update(assignment)
            }
            (kind, None) => Err(RepositoryError::ValidationError(format!(
                "{} event without assignment payload: id={}",
                kind.as_str(),
                event.assignment_id
            ))),
        }
    }
}

impl AllocationEventPublisher for RepositoryEventPublisher {
    fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.apply(event)?;
        tracing::debug!(
            assignment_id = %event.assignment_id,
            kind = event.kind.as_str(),
            "allocation event persisted"
        );
        Ok(())
    }
}
