// ==========================================
// Resource Planner - allocation API
// ==========================================
// Single gate in front of assignment persistence:
// propose / commit / release / change_lock_type / update_assignment.
// Concurrency: writes to one employee's assignments are serialized by a
// per-employee mutex; the ledger itself sits behind an RwLock so
// readers always see whole assignments. hydrate waits for in-flight
// writers through the writer gate.
// Outbound: every accepted change is published before it is applied;
// a refused event leaves the ledger untouched and surfaces as PublishFailed.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AllocationPolicy;
use crate::domain::assignment::{Assignment, AssignmentDraft};
use crate::domain::interval::CalendarInterval;
use crate::domain::types::LockType;
use crate::engine::directory::ReferenceDirectory;
use crate::engine::error::EngineError;
use crate::engine::events::{
    AllocationEvent, AllocationEventKind, AllocationEventPublisher, OptionalEventPublisher,
};
use crate::engine::ledger::{AssignmentLedger, AssignmentQuery};
use crate::engine::resolver::{AllocationWarning, ConflictResolver, Verdict};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a successful `commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub assignment_id: String,
    /// Informational; the caller should surface these to the user
    pub warnings: Vec<AllocationWarning>,
}

fn poisoned(err: impl Display) -> ApiError {
    ApiError::InternalError(format!("lock poisoned: {}", err))
}

fn lock_all(locks: &[Arc<Mutex<()>>]) -> ApiResult<Vec<MutexGuard<'_, ()>>> {
    locks.iter().map(|lock| lock.lock().map_err(poisoned)).collect()
}

// ==========================================
// AllocationApi
// ==========================================
pub struct AllocationApi {
    directory: Arc<ReferenceDirectory>,
    ledger: RwLock<AssignmentLedger>,
    /// Shared by every writer, exclusive for `hydrate`
    writer_gate: RwLock<()>,
    /// One entry per employee ever written. Entries are never pruned: a
    /// writer may still hold a clone of a removed mutex.
    employee_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    resolver: ConflictResolver,
    policy: AllocationPolicy,
    publisher: OptionalEventPublisher,
}

impl AllocationApi {
    pub fn new(
        directory: Arc<ReferenceDirectory>,
        policy: AllocationPolicy,
        publisher: Option<Arc<dyn AllocationEventPublisher>>,
    ) -> Self {
        Self {
            directory,
            ledger: RwLock::new(AssignmentLedger::new()),
            writer_gate: RwLock::new(()),
            employee_locks: Mutex::new(HashMap::new()),
            resolver: ConflictResolver::from_policy(&policy),
            policy,
            publisher: OptionalEventPublisher::from(publisher),
        }
    }

    pub fn directory(&self) -> &Arc<ReferenceDirectory> {
        &self.directory
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Replaces the ledger with persisted assignments.
    ///
    /// Persisted rows are trusted: capacity is not re-checked. Waits for
    /// in-flight writers and blocks new ones until the swap is done.
    pub fn hydrate(&self, assignments: Vec<Assignment>) -> ApiResult<usize> {
        let ledger = AssignmentLedger::from_assignments(assignments)?;
        let count = ledger.len();
        let _gate = self.writer_gate.write().map_err(poisoned)?;
        *self.write_ledger()? = ledger;
        info!(count, "ledger hydrated from persisted assignments");
        Ok(count)
    }

    // ==========================================
    // Evaluation
    // ==========================================

    /// Evaluates a proposal without touching the ledger.
    pub fn propose(&self, draft: &AssignmentDraft) -> ApiResult<Verdict> {
        let project_interval = self.checked_project_interval(draft)?;
        self.evaluate(draft, &project_interval, None)
    }

    /// Re-evaluates and inserts under the employee's lock.
    ///
    /// Returns `Rejected` for a hard-capacity breach; warnings do not block.
    pub fn commit(&self, draft: AssignmentDraft) -> ApiResult<CommitReceipt> {
        let project_interval = self.checked_project_interval(&draft)?;

        let _gate = self.shared_writer_gate()?;
        let locks = self.employee_locks(&[draft.employee_id.as_str()])?;
        let _guards = lock_all(&locks)?;

        let warnings = self
            .evaluate(&draft, &project_interval, None)?
            .into_warnings()
            .map_err(|err| {
                warn!(
                    employee_id = %draft.employee_id,
                    project_id = %draft.project_id,
                    error = %err,
                    "commit rejected"
                );
                err
            })?;

        let assignment = Assignment::from_draft(Uuid::new_v4().to_string(), draft);
        let assignment_id = assignment.assignment_id.clone();
        self.publish(&AllocationEvent::with_assignment(
            AllocationEventKind::Committed,
            &assignment,
        ))?;
        self.write_ledger()?.insert(assignment.clone())?;

        for warning in &warnings {
            warn!(assignment_id = %assignment_id, %warning, "committed with warning");
        }
        info!(
            assignment_id = %assignment_id,
            employee_id = %assignment.employee_id,
            project_id = %assignment.project_id,
            utilization = assignment.utilization.pct(),
            lock_type = %assignment.lock_type,
            "assignment committed"
        );

        Ok(CommitReceipt {
            assignment_id,
            warnings,
        })
    }

    // ==========================================
    // Mutations of existing assignments
    // ==========================================

    pub fn release(&self, assignment_id: &str) -> ApiResult<Assignment> {
        self.with_assignment_locks(assignment_id, None, || {
            let current = self.current(assignment_id)?;
            self.publish(&AllocationEvent::released(&current))?;
            let removed = self.write_ledger()?.remove(assignment_id)?;

            info!(
                assignment_id,
                employee_id = %removed.employee_id,
                "assignment released"
            );
            Ok(removed)
        })
    }

    /// Switches the lock type after re-checking capacity against the
    /// employee's other assignments.
    ///
    /// Only a hard-capacity breach blocks the change; warnings come back in
    /// the verdict. Setting the current lock type is a no-op.
    pub fn change_lock_type(&self, assignment_id: &str, lock_type: LockType) -> ApiResult<Verdict> {
        self.with_assignment_locks(assignment_id, None, || {
            let current = self.current(assignment_id)?;
            if current.lock_type == lock_type {
                debug!(assignment_id, %lock_type, "lock type unchanged");
                return Ok(Verdict::Accepted);
            }

            let proposal = current.to_draft().with_lock_type(lock_type);
            let project_interval = self.directory.project_interval(&proposal.project_id)?;
            let verdict = self.evaluate(&proposal, &project_interval, Some(assignment_id))?;
            if let Verdict::Rejected(rejection) = verdict {
                warn!(assignment_id, %rejection, "lock change rejected");
                return Err(ApiError::Rejected(rejection));
            }

            let mut updated = current.clone();
            updated.lock_type = lock_type;
            updated.updated_at = Utc::now();
            self.publish(&AllocationEvent::with_assignment(
                AllocationEventKind::LockChanged,
                &updated,
            ))?;
            self.write_ledger()?.replace(updated)?;

            info!(
                assignment_id,
                from = %current.lock_type,
                to = %lock_type,
                "lock type changed"
            );
            Ok(verdict)
        })
    }

    /// Replaces an assignment with an edited version.
    ///
    /// The edit is checked against every other assignment of the target
    /// employee (the employee may change). Rejected edits change nothing.
    pub fn update_assignment(
        &self,
        assignment_id: &str,
        draft: AssignmentDraft,
    ) -> ApiResult<Verdict> {
        let project_interval = self.checked_project_interval(&draft)?;
        let target_employee = draft.employee_id.clone();

        self.with_assignment_locks(assignment_id, Some(target_employee.as_str()), move || {
            let previous = self.current(assignment_id)?;
            let verdict = self.evaluate(&draft, &project_interval, Some(assignment_id))?;
            if let Verdict::Rejected(rejection) = verdict {
                warn!(assignment_id, %rejection, "update rejected");
                return Err(ApiError::Rejected(rejection));
            }

            let mut updated = Assignment::from_draft(assignment_id, draft);
            updated.created_at = previous.created_at;
            self.publish(&AllocationEvent::with_assignment(
                AllocationEventKind::Updated,
                &updated,
            ))?;
            self.write_ledger()?.replace(updated.clone())?;

            info!(
                assignment_id,
                employee_id = %updated.employee_id,
                interval = %updated.interval,
                utilization = updated.utilization.pct(),
                "assignment updated"
            );
            Ok(verdict)
        })
    }

    // ==========================================
    // Reads
    // ==========================================

    pub fn get_assignment(&self, assignment_id: &str) -> ApiResult<Assignment> {
        self.current(assignment_id)
    }

    /// Ordered by interval start, ties by insertion order.
    pub fn assignments_for(&self, employee_id: &str) -> ApiResult<Vec<Assignment>> {
        Ok(self
            .read_ledger()?
            .assignments_for(employee_id)
            .cloned()
            .collect())
    }

    pub fn list_assignments(&self, query: &AssignmentQuery) -> ApiResult<Vec<Assignment>> {
        Ok(self.read_ledger()?.query(query))
    }

    pub fn snapshot(&self) -> ApiResult<Vec<Assignment>> {
        Ok(self.read_ledger()?.all())
    }

    // ==========================================
    // Internals
    // ==========================================

    fn read_ledger(&self) -> ApiResult<RwLockReadGuard<'_, AssignmentLedger>> {
        self.ledger.read().map_err(poisoned)
    }

    fn write_ledger(&self) -> ApiResult<RwLockWriteGuard<'_, AssignmentLedger>> {
        self.ledger.write().map_err(poisoned)
    }

    /// Taken before any employee lock.
    fn shared_writer_gate(&self) -> ApiResult<RwLockReadGuard<'_, ()>> {
        self.writer_gate.read().map_err(poisoned)
    }

    fn current(&self, assignment_id: &str) -> ApiResult<Assignment> {
        self.read_ledger()?
            .get(assignment_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("assignment", assignment_id).into())
    }

    /// Validates the draft and its references, returning the project window.
    fn checked_project_interval(&self, draft: &AssignmentDraft) -> ApiResult<CalendarInterval> {
        draft.validate()?;
        self.directory
            .ensure_assignment_refs(&draft.employee_id, &draft.project_id, &draft.role_id)?;
        Ok(self.directory.project_interval(&draft.project_id)?)
    }

    fn evaluate(
        &self,
        proposal: &AssignmentDraft,
        project_interval: &CalendarInterval,
        excluded_id: Option<&str>,
    ) -> ApiResult<Verdict> {
        let ledger = self.read_ledger()?;
        let verdict = match excluded_id {
            Some(excluded) => self.resolver.evaluate(
                proposal,
                project_interval,
                ledger.overlapping_excluding(&proposal.employee_id, &proposal.interval, excluded),
            ),
            None => self.resolver.evaluate(
                proposal,
                project_interval,
                ledger.overlapping(&proposal.employee_id, &proposal.interval),
            ),
        };
        Ok(verdict)
    }

    /// Mutexes for the given employees, sorted by id so multi-employee
    /// writers always acquire them in the same order.
    fn employee_locks(&self, employee_ids: &[&str]) -> ApiResult<Vec<Arc<Mutex<()>>>> {
        let mut ids = employee_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut registry = self.employee_locks.lock().map_err(poisoned)?;
        Ok(ids
            .into_iter()
            .map(|id| Arc::clone(registry.entry(id.to_string()).or_default()))
            .collect())
    }

    /// Runs `f` holding the lock of the assignment's owner (and of
    /// `extra_employee`, if given).
    ///
    /// The owner is read before locking, so it is re-checked afterwards;
    /// a concurrent move to another employee makes the loop retry.
    fn with_assignment_locks<T, F>(
        &self,
        assignment_id: &str,
        extra_employee: Option<&str>,
        f: F,
    ) -> ApiResult<T>
    where
        F: FnOnce() -> ApiResult<T>,
    {
        let _gate = self.shared_writer_gate()?;
        loop {
            let owner = self
                .read_ledger()?
                .owner_of(assignment_id)
                .map(str::to_string)
                .ok_or_else(|| ApiError::from(EngineError::not_found("assignment", assignment_id)))?;

            let mut ids = vec![owner.as_str()];
            ids.extend(extra_employee);
            let locks = self.employee_locks(&ids)?;
            let _guards = lock_all(&locks)?;

            if self.read_ledger()?.owner_of(assignment_id) == Some(owner.as_str()) {
                return f();
            }
            if !self.read_ledger()?.contains(assignment_id) {
                return Err(EngineError::not_found("assignment", assignment_id).into());
            }
            debug!(assignment_id, "assignment moved while waiting for lock, retrying");
        }
    }

    /// Hands `event` to the publisher; the ledger is only changed after
    /// this returns `Ok`.
    fn publish(&self, event: &AllocationEvent) -> ApiResult<()> {
        self.publisher.publish(event).map_err(|err| {
            warn!(
                assignment_id = %event.assignment_id,
                kind = event.kind.as_str(),
                error = %err,
                "event refused, change not applied"
            );
            ApiError::PublishFailed(anyhow::anyhow!(err))
        })
    }
}
