// ==========================================
// Resource Planner - conflict resolver
// ==========================================
// Input: proposed assignment + project window + existing assignments
// Output: Verdict (Accepted / AcceptedWithWarning / Rejected)
// ==========================================
// Rules:
// 1) hard proposal: existing hard peak + proposal > limit -> Rejected
// 2) soft proposal: existing hard peak > limit -> Rejected
// 3) combined peak + proposal > limit -> warning (soft overcommit)
// 4) proposal window not inside project window -> warning
// 5) exactly at the limit is accepted without warning
// ==========================================

use crate::config::AllocationPolicy;
use crate::domain::assignment::{Assignment, AssignmentDraft};
use crate::domain::interval::CalendarInterval;
use crate::domain::types::LockType;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::utilization::{UtilizationAccumulator, UtilizationSummary};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

// ==========================================
// Verdict
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationWarning {
    /// Hard plus soft load passes the limit on some day
    SoftOvercommit {
        combined_pct: u32,
        limit_pct: u32,
        window: Option<CalendarInterval>,
    },
    /// Assignment window is not fully inside the project lifetime
    OutsideProjectWindow {
        project_id: String,
        project_interval: CalendarInterval,
        assignment_interval: CalendarInterval,
    },
}

impl fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationWarning::SoftOvercommit {
                combined_pct,
                limit_pct,
                window,
            } => {
                write!(f, "combined utilization {}% exceeds {}%", combined_pct, limit_pct)?;
                if let Some(window) = window {
                    write!(f, " during {}", window)?;
                }
                Ok(())
            }
            AllocationWarning::OutsideProjectWindow {
                project_id,
                project_interval,
                assignment_interval,
            } => write!(
                f,
                "assignment {} is outside project {} window {}",
                assignment_interval, project_id, project_interval
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionKind {
    CapacityExceeded,
}

/// Why a proposal was refused, with the figures that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub lock_type: LockType,
    /// Existing hard load at its peak inside the proposal window
    pub existing_hard_pct: u32,
    pub proposed_pct: u32,
    pub limit_pct: u32,
    pub window: Option<CalendarInterval>,
}

impl Rejection {
    /// Hard load the proposal would produce at the peak.
    pub fn resulting_hard_pct(&self) -> u32 {
        match self.lock_type {
            LockType::Hard => self.existing_hard_pct + self.proposed_pct,
            LockType::Soft => self.existing_hard_pct,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} proposal of {}% on top of {}% hard load exceeds {}%",
            self.kind, self.lock_type, self.proposed_pct, self.existing_hard_pct, self.limit_pct
        )?;
        if let Some(window) = &self.window {
            write!(f, " during {}", window)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    AcceptedWithWarning(Vec<AllocationWarning>),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Verdict::Rejected(_))
    }

    pub fn warnings(&self) -> &[AllocationWarning] {
        match self {
            Verdict::AcceptedWithWarning(warnings) => warnings,
            _ => &[],
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Warnings of an accepted verdict; a rejection becomes `CapacityExceeded`.
    pub fn into_warnings(self) -> EngineResult<Vec<AllocationWarning>> {
        match self {
            Verdict::Accepted => Ok(Vec::new()),
            Verdict::AcceptedWithWarning(warnings) => Ok(warnings),
            Verdict::Rejected(rejection) => Err(EngineError::CapacityExceeded(rejection)),
        }
    }
}

// ==========================================
// ConflictResolver
// ==========================================
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    capacity_limit_pct: u32,
}

impl ConflictResolver {
    pub fn new(capacity_limit_pct: u32) -> Self {
        Self { capacity_limit_pct }
    }

    pub fn from_policy(policy: &AllocationPolicy) -> Self {
        Self::new(policy.capacity_limit_pct)
    }

    pub fn capacity_limit_pct(&self) -> u32 {
        self.capacity_limit_pct
    }

    /// Evaluates a proposal against the employee's existing assignments.
    ///
    /// `existing` may include assignments outside the proposal window;
    /// only days shared with the proposal count.
    #[instrument(skip(self, existing), fields(
        employee_id = %proposal.employee_id,
        project_id = %proposal.project_id,
        lock_type = %proposal.lock_type,
        utilization = proposal.utilization.pct()
    ))]
    pub fn evaluate<'a, I>(
        &self,
        proposal: &AssignmentDraft,
        project_interval: &CalendarInterval,
        existing: I,
    ) -> Verdict
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let load = UtilizationAccumulator::summarize(existing, &proposal.interval);
        let verdict = self.decide(proposal, project_interval, &load);
        debug!(
            hard_total = load.hard_total,
            soft_total = load.soft_total,
            combined_total = load.combined_total,
            overlap_count = load.overlap_count,
            ?verdict,
            "evaluated proposal"
        );
        verdict
    }

    fn decide(
        &self,
        proposal: &AssignmentDraft,
        project_interval: &CalendarInterval,
        load: &UtilizationSummary,
    ) -> Verdict {
        let limit = self.capacity_limit_pct;
        let proposed = proposal.utilization.pct();

        let hard_breach = match proposal.lock_type {
            LockType::Hard => load.hard_total + proposed > limit,
            LockType::Soft => load.hard_total > limit,
        };
        if hard_breach {
            return Verdict::Rejected(Rejection {
                kind: RejectionKind::CapacityExceeded,
                lock_type: proposal.lock_type,
                existing_hard_pct: load.hard_total,
                proposed_pct: proposed,
                limit_pct: limit,
                window: load.hard_peak_window.or(Some(proposal.interval)),
            });
        }

        let mut warnings = Vec::new();

        let combined = load.combined_total + proposed;
        if combined > limit {
            warnings.push(AllocationWarning::SoftOvercommit {
                combined_pct: combined,
                limit_pct: limit,
                window: load.peak_window.or(Some(proposal.interval)),
            });
        }

        if !project_interval.contains(&proposal.interval) {
            warnings.push(AllocationWarning::OutsideProjectWindow {
                project_id: proposal.project_id.clone(),
                project_interval: *project_interval,
                assignment_interval: proposal.interval,
            });
        }

        if warnings.is_empty() {
            Verdict::Accepted
        } else {
            Verdict::AcceptedWithWarning(warnings)
        }
    }
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::from_policy(&AllocationPolicy::default())
    }
}
