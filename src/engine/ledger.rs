// ==========================================
// Resource Planner - assignment ledger
// ==========================================
// In-memory set of committed assignments, indexed by employee.
// Per-employee slices stay ordered by (interval start, insertion seq).
// Not synchronized: the owning service serializes writers.
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::interval::CalendarInterval;
use crate::domain::types::LockType;
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct LedgerEntry {
    seq: u64,
    assignment: Assignment,
}

impl LedgerEntry {
    fn sort_key(&self) -> (NaiveDate, u64) {
        (self.assignment.interval.start(), self.seq)
    }
}

/// Explicit filter for assignment listings.
///
/// Every field is optional; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentQuery {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub lock_type: Option<LockType>,
    /// Only assignments whose window covers this day
    #[serde(default)]
    pub active_on: Option<NaiveDate>,
}

impl AssignmentQuery {
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    fn matches(&self, assignment: &Assignment) -> bool {
        self.employee_id
            .as_deref()
            .map_or(true, |id| assignment.employee_id == id)
            && self
                .project_id
                .as_deref()
                .map_or(true, |id| assignment.project_id == id)
            && self.lock_type.map_or(true, |lock| assignment.lock_type == lock)
            && self
                .active_on
                .map_or(true, |day| assignment.interval.contains_day(day))
    }
}

#[derive(Debug, Default)]
pub struct AssignmentLedger {
    by_employee: HashMap<String, Vec<LedgerEntry>>,
    // assignment_id -> employee_id
    owners: HashMap<String, String>,
    next_seq: u64,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from already-persisted rows, in the given order.
    pub fn from_assignments(assignments: Vec<Assignment>) -> EngineResult<Self> {
        let mut ledger = Self::new();
        for assignment in assignments {
            ledger.insert(assignment)?;
        }
        Ok(ledger)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn contains(&self, assignment_id: &str) -> bool {
        self.owners.contains_key(assignment_id)
    }

    pub fn owner_of(&self, assignment_id: &str) -> Option<&str> {
        self.owners.get(assignment_id).map(String::as_str)
    }

    pub fn get(&self, assignment_id: &str) -> Option<&Assignment> {
        let employee_id = self.owners.get(assignment_id)?;
        self.by_employee
            .get(employee_id)?
            .iter()
            .find(|entry| entry.assignment.assignment_id == assignment_id)
            .map(|entry| &entry.assignment)
    }

    // ==========================================
    // Reads
    // ==========================================

    /// Assignments of one employee, ordered by start date then insertion order.
    ///
    /// The returned iterator is `Clone`, so callers can restart it.
    pub fn assignments_for<'a>(
        &'a self,
        employee_id: &str,
    ) -> impl Iterator<Item = &'a Assignment> + Clone + 'a {
        self.by_employee
            .get(employee_id)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|entry| &entry.assignment)
    }

    /// Assignments of one employee whose window overlaps `interval`.
    pub fn overlapping<'a>(
        &'a self,
        employee_id: &str,
        interval: &'a CalendarInterval,
    ) -> impl Iterator<Item = &'a Assignment> + Clone + 'a {
        self.assignments_for(employee_id)
            .filter(move |assignment| assignment.interval.overlaps(interval))
    }

    /// Same as `overlapping`, leaving out one assignment (used for re-evaluation).
    pub fn overlapping_excluding<'a>(
        &'a self,
        employee_id: &str,
        interval: &'a CalendarInterval,
        excluded_id: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + Clone + 'a {
        self.overlapping(employee_id, interval)
            .filter(move |assignment| assignment.assignment_id != excluded_id)
    }

    pub fn query(&self, query: &AssignmentQuery) -> Vec<Assignment> {
        let mut matched: Vec<&LedgerEntry> = match query.employee_id.as_deref() {
            Some(employee_id) => self
                .by_employee
                .get(employee_id)
                .map(|entries| entries.iter().collect())
                .unwrap_or_default(),
            None => self.by_employee.values().flatten().collect(),
        };
        matched.retain(|entry| query.matches(&entry.assignment));
        matched.sort_by_key(|entry| entry.sort_key());
        matched
            .into_iter()
            .map(|entry| entry.assignment.clone())
            .collect()
    }

    /// All assignments, ordered by start date then insertion order.
    pub fn all(&self) -> Vec<Assignment> {
        self.query(&AssignmentQuery::default())
    }

    pub fn employee_ids(&self) -> impl Iterator<Item = &str> {
        self.by_employee
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(employee_id, _)| employee_id.as_str())
    }

    // ==========================================
    // Writes
    // ==========================================

    pub fn insert(&mut self, assignment: Assignment) -> EngineResult<()> {
        if self.owners.contains_key(&assignment.assignment_id) {
            return Err(EngineError::DuplicateAssignment(
                assignment.assignment_id.clone(),
            ));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.place(LedgerEntry { seq, assignment });
        Ok(())
    }

    pub fn remove(&mut self, assignment_id: &str) -> EngineResult<Assignment> {
        self.take(assignment_id)
            .map(|entry| entry.assignment)
            .ok_or_else(|| EngineError::not_found("assignment", assignment_id))
    }

    /// Swaps an assignment for a new version with the same id.
    ///
    /// The entry keeps its insertion sequence; the employee may change.
    /// Returns the previous version.
    pub fn replace(&mut self, assignment: Assignment) -> EngineResult<Assignment> {
        let previous = self
            .take(&assignment.assignment_id)
            .ok_or_else(|| EngineError::not_found("assignment", &assignment.assignment_id))?;
        let seq = previous.seq;
        self.place(LedgerEntry { seq, assignment });
        Ok(previous.assignment)
    }

    fn place(&mut self, entry: LedgerEntry) {
        let employee_id = entry.assignment.employee_id.clone();
        self.owners
            .insert(entry.assignment.assignment_id.clone(), employee_id.clone());
        let slice = self.by_employee.entry(employee_id).or_default();
        let key = entry.sort_key();
        let position = slice.partition_point(|existing| existing.sort_key() < key);
        slice.insert(position, entry);
    }

    fn take(&mut self, assignment_id: &str) -> Option<LedgerEntry> {
        let employee_id = self.owners.remove(assignment_id)?;
        let slice = self.by_employee.get_mut(&employee_id)?;
        let position = slice
            .iter()
            .position(|entry| entry.assignment.assignment_id == assignment_id)?;
        let entry = slice.remove(position);
        if slice.is_empty() {
            self.by_employee.remove(&employee_id);
        }
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::{AssignmentDraft, Utilization};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn assignment(id: &str, employee: &str, start: NaiveDate, end: NaiveDate) -> Assignment {
        let draft = AssignmentDraft::new(
            employee,
            "P1",
            "R1",
            CalendarInterval::new(start, end).unwrap(),
            Utilization::new(20).unwrap(),
            LockType::Hard,
        );
        Assignment::from_draft(id, draft)
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut ledger = AssignmentLedger::new();
        ledger.insert(assignment("A1", "E1", d(1, 1), d(1, 31))).unwrap();

        let err = ledger
            .insert(assignment("A1", "E2", d(2, 1), d(2, 5)))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateAssignment("A1".to_string()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_assignments_for_orders_by_start_then_insertion() {
        let mut ledger = AssignmentLedger::new();
        ledger.insert(assignment("late", "E1", d(3, 1), d(3, 5))).unwrap();
        ledger.insert(assignment("tie-1", "E1", d(1, 10), d(1, 20))).unwrap();
        ledger.insert(assignment("early", "E1", d(1, 1), d(1, 2))).unwrap();
        ledger.insert(assignment("tie-2", "E1", d(1, 10), d(1, 11))).unwrap();

        let ids: Vec<&str> = ledger
            .assignments_for("E1")
            .map(|a| a.assignment_id.as_str())
            .collect();
        assert_eq!(ids, vec!["early", "tie-1", "tie-2", "late"]);

        let iter = ledger.assignments_for("E1");
        assert_eq!(iter.clone().count(), iter.count());
        assert_eq!(ledger.assignments_for("nobody").count(), 0);
    }

    #[test]
    fn test_overlapping_filters_by_interval() {
        let mut ledger = AssignmentLedger::new();
        ledger.insert(assignment("jan", "E1", d(1, 1), d(1, 31))).unwrap();
        ledger.insert(assignment("mar", "E1", d(3, 1), d(3, 31))).unwrap();
        ledger.insert(assignment("other", "E2", d(1, 1), d(1, 31))).unwrap();

        let window = CalendarInterval::new(d(1, 31), d(2, 15)).unwrap();
        let ids: Vec<&str> = ledger
            .overlapping("E1", &window)
            .map(|a| a.assignment_id.as_str())
            .collect();
        assert_eq!(ids, vec!["jan"]);

        assert_eq!(ledger.overlapping_excluding("E1", &window, "jan").count(), 0);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut ledger = AssignmentLedger::new();
        let err = ledger.remove("ghost").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { entity: "assignment", .. }));
    }

    #[test]
    fn test_remove_clears_indexes() {
        let mut ledger = AssignmentLedger::new();
        ledger.insert(assignment("A1", "E1", d(1, 1), d(1, 31))).unwrap();
        let removed = ledger.remove("A1").unwrap();
        assert_eq!(removed.assignment_id, "A1");
        assert!(ledger.is_empty());
        assert!(ledger.get("A1").is_none());
        assert_eq!(ledger.employee_ids().count(), 0);
    }

    #[test]
    fn test_replace_moves_between_employees_and_keeps_sequence() {
        let mut ledger = AssignmentLedger::new();
        ledger.insert(assignment("A1", "E1", d(1, 10), d(1, 20))).unwrap();
        ledger.insert(assignment("A2", "E2", d(1, 10), d(1, 20))).unwrap();

        let moved = assignment("A1", "E2", d(1, 10), d(1, 12));
        let previous = ledger.replace(moved).unwrap();
        assert_eq!(previous.employee_id, "E1");
        assert_eq!(ledger.owner_of("A1"), Some("E2"));

        // A1 was inserted first, so it still wins the tie on start date
        let ids: Vec<&str> = ledger
            .assignments_for("E2")
            .map(|a| a.assignment_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A1", "A2"]);
    }

    #[test]
    fn test_query_combines_filters() {
        let mut ledger = AssignmentLedger::new();
        ledger.insert(assignment("A1", "E1", d(1, 1), d(1, 31))).unwrap();
        ledger.insert(assignment("A2", "E2", d(1, 15), d(2, 15))).unwrap();
        let mut soft = assignment("A3", "E2", d(1, 1), d(1, 5));
        soft.lock_type = LockType::Soft;
        ledger.insert(soft).unwrap();

        let query = AssignmentQuery {
            lock_type: Some(LockType::Hard),
            active_on: Some(d(1, 20)),
            ..AssignmentQuery::default()
        };
        let ids: Vec<String> = ledger
            .query(&query)
            .into_iter()
            .map(|a| a.assignment_id)
            .collect();
        assert_eq!(ids, vec!["A1".to_string(), "A2".to_string()]);

        assert_eq!(ledger.query(&AssignmentQuery::for_employee("E2")).len(), 2);
        assert_eq!(ledger.all().len(), 3);
    }
}
