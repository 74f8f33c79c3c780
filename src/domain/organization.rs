// ==========================================
// Resource Planner - organization reference data
// ==========================================
// Department / Role / Employee
// Employee.reporting_manager_id is self-referential and must stay
// acyclic; the check lives in engine::hierarchy.
// ==========================================

use crate::domain::error::{require_text, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Department {
    pub fn new(department_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            department_id: department_id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("department_id", &self.department_id)?;
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Role {
    pub fn new(role_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("role_id", &self.role_id)?;
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    /// Human-facing staff number (e.g. "EMP-0042")
    pub employee_code: String,
    pub name: String,
    pub designation: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_joining: Option<NaiveDate>,
}

impl Employee {
    pub fn new(
        employee_id: impl Into<String>,
        name: impl Into<String>,
        designation: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let employee_id = employee_id.into();
        Self {
            employee_code: employee_id.clone(),
            employee_id,
            name: name.into(),
            designation: designation.into(),
            email: email.into(),
            phone_number: None,
            department_id: None,
            reporting_manager_id: None,
            date_of_joining: None,
        }
    }

    pub fn with_department(mut self, department_id: impl Into<String>) -> Self {
        self.department_id = Some(department_id.into());
        self
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.reporting_manager_id = Some(manager_id.into());
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("employee_id", &self.employee_id)?;
        require_text("employee_code", &self.employee_code)?;
        require_text("name", &self.name)?;
        require_text("designation", &self.designation)?;
        require_text("email", &self.email)
    }
}
