// ==========================================
// Resource Planner - hiring requirement
// ==========================================

use crate::domain::error::{require_text, DomainError, DomainResult};
use crate::domain::types::UrgencyLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringRequirement {
    pub requirement_id: String,
    pub position_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    /// >= 1
    pub number_of_openings: u32,
    #[serde(default)]
    pub urgency: UrgencyLevel,
    pub experience_required: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

impl HiringRequirement {
    pub fn new(
        requirement_id: impl Into<String>,
        position_name: impl Into<String>,
        number_of_openings: u32,
        urgency: UrgencyLevel,
        experience_required: impl Into<String>,
    ) -> Self {
        Self {
            requirement_id: requirement_id.into(),
            position_name: position_name.into(),
            department_id: None,
            number_of_openings,
            urgency,
            experience_required: experience_required.into(),
            job_description: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("requirement_id", &self.requirement_id)?;
        require_text("position_name", &self.position_name)?;
        require_text("experience_required", &self.experience_required)?;
        if self.number_of_openings < 1 {
            return Err(DomainError::InvalidOpenings(self.number_of_openings));
        }
        Ok(())
    }
}
