// ==========================================
// Resource Planner - dashboard API
// ==========================================
// Read-only aggregates for the summary cards and utilization views.
// Reads the allocation ledger and the reference directory; never writes.
// ==========================================

use crate::api::allocation_api::AllocationApi;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::assignment::Assignment;
use crate::domain::interval::CalendarInterval;
use crate::domain::types::{UrgencyLevel, UtilizationBand};
use crate::engine::ledger::AssignmentQuery;
use crate::engine::utilization::{LoadSegment, UtilizationAccumulator, UtilizationSummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub active_projects: usize,
    pub total_employees: usize,
    /// Mean utilization over all assignments, rounded half up; 0 when none
    pub average_utilization_pct: u32,
    pub average_utilization_band: UtilizationBand,
    /// Employees with no assignment covering the reference day
    pub available_resources: usize,
    /// Sum of openings over all hiring requirements
    pub open_positions: u32,
    /// Number of hiring requirements per urgency level
    pub requirements_by_urgency: BTreeMap<UrgencyLevel, usize>,
}

/// Load of one employee over a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLoad {
    pub employee_id: String,
    pub window: CalendarInterval,
    pub summary: UtilizationSummary,
    pub peak_band: UtilizationBand,
    pub profile: Vec<LoadSegment>,
}

/// One assignment row with its badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub assignment: Assignment,
    pub band: UtilizationBand,
}

pub struct DashboardApi {
    allocation: Arc<AllocationApi>,
}

impl DashboardApi {
    pub fn new(allocation: Arc<AllocationApi>) -> Self {
        Self { allocation }
    }

    pub fn summary(&self, today: NaiveDate) -> ApiResult<DashboardSummary> {
        let directory = self.allocation.directory();
        let assignments = self.allocation.snapshot()?;

        let active_projects = directory
            .projects()?
            .iter()
            .filter(|project| project.is_active())
            .count();

        let employees = directory.employees()?;
        let busy: HashSet<&str> = assignments
            .iter()
            .filter(|assignment| assignment.interval.contains_day(today))
            .map(|assignment| assignment.employee_id.as_str())
            .collect();
        let available_resources = employees
            .iter()
            .filter(|employee| !busy.contains(employee.employee_id.as_str()))
            .count();

        let average_utilization_pct = rounded_mean(
            assignments
                .iter()
                .map(|assignment| assignment.utilization.pct()),
        );

        let mut open_positions = 0;
        let mut requirements_by_urgency: BTreeMap<UrgencyLevel, usize> = [
            UrgencyLevel::Normal,
            UrgencyLevel::Medium,
            UrgencyLevel::Urgent,
        ]
        .into_iter()
        .map(|level| (level, 0))
        .collect();
        for requirement in directory.hiring_requirements()? {
            open_positions += requirement.number_of_openings;
            *requirements_by_urgency.entry(requirement.urgency).or_default() += 1;
        }

        Ok(DashboardSummary {
            active_projects,
            total_employees: employees.len(),
            average_utilization_pct,
            average_utilization_band: self.utilization_band(average_utilization_pct),
            available_resources,
            open_positions,
            requirements_by_urgency,
        })
    }

    pub fn utilization_band(&self, pct: u32) -> UtilizationBand {
        self.allocation.policy().utilization_band(pct)
    }

    pub fn employee_load(
        &self,
        employee_id: &str,
        window: CalendarInterval,
    ) -> ApiResult<EmployeeLoad> {
        if self.allocation.directory().employee(employee_id)?.is_none() {
            return Err(ApiError::NotFound(format!("employee(id={})", employee_id)));
        }

        let assignments = self.allocation.assignments_for(employee_id)?;
        let summary = UtilizationAccumulator::summarize(&assignments, &window);
        let profile = UtilizationAccumulator::profile(&assignments, &window);

        Ok(EmployeeLoad {
            employee_id: employee_id.to_string(),
            window,
            peak_band: self.utilization_band(summary.combined_total),
            summary,
            profile,
        })
    }

    pub fn project_roster(&self, project_id: &str) -> ApiResult<Vec<RosterEntry>> {
        if self.allocation.directory().project(project_id)?.is_none() {
            return Err(ApiError::NotFound(format!("project(id={})", project_id)));
        }

        Ok(self
            .allocation
            .list_assignments(&AssignmentQuery::for_project(project_id))?
            .into_iter()
            .map(|assignment| RosterEntry {
                band: self.utilization_band(assignment.utilization.pct()),
                assignment,
            })
            .collect())
    }
}

fn rounded_mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return 0;
    }
    // values are percentages, so the mean fits in u32
    ((2 * sum + count) / (2 * count)) as u32
}
