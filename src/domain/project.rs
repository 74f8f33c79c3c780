// ==========================================
// Resource Planner - project
// ==========================================
// project_code is human-readable and unique across the directory
// ==========================================

use crate::domain::error::{require_text, DomainError, DomainResult};
use crate::domain::interval::CalendarInterval;
use crate::domain::types::ProjectStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub project_code: String,
    pub name: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project lifetime
    pub interval: CalendarInterval,
    #[serde(default)]
    pub status: ProjectStatus,
    /// 0..=100
    #[serde(default)]
    pub completion_pct: u32,
}

impl Project {
    pub fn new(
        project_id: impl Into<String>,
        project_code: impl Into<String>,
        name: impl Into<String>,
        client_name: impl Into<String>,
        interval: CalendarInterval,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            project_code: project_code.into(),
            name: name.into(),
            client_name: client_name.into(),
            description: None,
            interval,
            status: ProjectStatus::Active,
            completion_pct: 0,
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("project_id", &self.project_id)?;
        require_text("project_code", &self.project_code)?;
        require_text("name", &self.name)?;
        require_text("client_name", &self.client_name)?;
        if self.completion_pct > 100 {
            return Err(DomainError::InvalidCompletion(self.completion_pct));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Project {
        let interval = CalendarInterval::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        )
        .unwrap();
        Project::new("P1", "PRJ-001", "Billing revamp", "Acme", interval)
    }

    #[test]
    fn test_completion_above_hundred_rejected() {
        let mut project = sample();
        project.completion_pct = 120;
        assert_eq!(
            project.validate().unwrap_err(),
            DomainError::InvalidCompletion(120)
        );
    }

    #[test]
    fn test_status_defaults_to_active() {
        let project = sample();
        assert!(project.is_active());
        assert!(!project.with_status(ProjectStatus::OnHold).is_active());
    }
}
