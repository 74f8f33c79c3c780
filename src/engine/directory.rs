// ==========================================
// Resource Planner - reference directory
// ==========================================
// In-memory departments / roles / employees / projects / hiring
// requirements, the long-lived data assignments point at.
// Writes validate references, project-code uniqueness and the
// reporting hierarchy before anything is stored.
// ==========================================

use crate::domain::hiring::HiringRequirement;
use crate::domain::interval::CalendarInterval;
use crate::domain::organization::{Department, Employee, Role};
use crate::domain::project::Project;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::hierarchy;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct DirectoryState {
    departments: BTreeMap<String, Department>,
    roles: BTreeMap<String, Role>,
    employees: BTreeMap<String, Employee>,
    projects: BTreeMap<String, Project>,
    hiring_requirements: BTreeMap<String, HiringRequirement>,
}

impl DirectoryState {
    fn manager_of<'a>(&'a self, employee_id: &str) -> Option<&'a str> {
        self.employees
            .get(employee_id)
            .and_then(|employee| employee.reporting_manager_id.as_deref())
    }

    fn ensure_department(&self, department_id: Option<&str>) -> EngineResult<()> {
        match department_id {
            Some(id) if !self.departments.contains_key(id) => {
                Err(EngineError::not_found("department", id))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReferenceDirectory {
    state: RwLock<DirectoryState>,
}

impl ReferenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, DirectoryState>> {
        self.state
            .read()
            .map_err(|e| EngineError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, DirectoryState>> {
        self.state
            .write()
            .map_err(|e| EngineError::LockPoisoned(e.to_string()))
    }

    // ==========================================
    // Departments / roles
    // ==========================================

    pub fn upsert_department(&self, department: Department) -> EngineResult<()> {
        department.validate()?;
        let mut state = self.write()?;
        state
            .departments
            .insert(department.department_id.clone(), department);
        Ok(())
    }

    pub fn remove_department(&self, department_id: &str) -> EngineResult<Department> {
        let mut state = self.write()?;
        let removed = state
            .departments
            .remove(department_id)
            .ok_or_else(|| EngineError::not_found("department", department_id))?;

        // references are cleared, not cascaded
        for employee in state.employees.values_mut() {
            if employee.department_id.as_deref() == Some(department_id) {
                employee.department_id = None;
            }
        }
        for requirement in state.hiring_requirements.values_mut() {
            if requirement.department_id.as_deref() == Some(department_id) {
                requirement.department_id = None;
            }
        }
        Ok(removed)
    }

    pub fn department(&self, department_id: &str) -> EngineResult<Option<Department>> {
        Ok(self.read()?.departments.get(department_id).cloned())
    }

    pub fn departments(&self) -> EngineResult<Vec<Department>> {
        Ok(self.read()?.departments.values().cloned().collect())
    }

    pub fn upsert_role(&self, role: Role) -> EngineResult<()> {
        role.validate()?;
        self.write()?.roles.insert(role.role_id.clone(), role);
        Ok(())
    }

    pub fn remove_role(&self, role_id: &str) -> EngineResult<Role> {
        self.write()?
            .roles
            .remove(role_id)
            .ok_or_else(|| EngineError::not_found("role", role_id))
    }

    pub fn role(&self, role_id: &str) -> EngineResult<Option<Role>> {
        Ok(self.read()?.roles.get(role_id).cloned())
    }

    pub fn roles(&self) -> EngineResult<Vec<Role>> {
        Ok(self.read()?.roles.values().cloned().collect())
    }

    // ==========================================
    // Employees
    // ==========================================

    /// Inserts or edits an employee.
    ///
    /// # Errors
    /// - `NotFound` when the department or manager is unknown
    /// - `CyclicHierarchy` when the manager's chain reaches this employee
    pub fn upsert_employee(&self, employee: Employee) -> EngineResult<()> {
        employee.validate()?;
        let mut state = self.write()?;

        state.ensure_department(employee.department_id.as_deref())?;
        if let Some(manager_id) = employee.reporting_manager_id.as_deref() {
            if manager_id != employee.employee_id && !state.employees.contains_key(manager_id) {
                return Err(EngineError::not_found("employee", manager_id));
            }
        }
        hierarchy::ensure_acyclic(
            &employee.employee_id,
            employee.reporting_manager_id.as_deref(),
            |id| state.manager_of(id),
        )?;

        tracing::debug!(employee_id = %employee.employee_id, "employee stored");
        state
            .employees
            .insert(employee.employee_id.clone(), employee);
        Ok(())
    }

    /// Removes an employee; their direct reports lose the manager link.
    pub fn remove_employee(&self, employee_id: &str) -> EngineResult<Employee> {
        let mut state = self.write()?;
        let removed = state
            .employees
            .remove(employee_id)
            .ok_or_else(|| EngineError::not_found("employee", employee_id))?;
        for employee in state.employees.values_mut() {
            if employee.reporting_manager_id.as_deref() == Some(employee_id) {
                employee.reporting_manager_id = None;
            }
        }
        Ok(removed)
    }

    pub fn employee(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.read()?.employees.get(employee_id).cloned())
    }

    pub fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.read()?.employees.values().cloned().collect())
    }

    pub fn employee_count(&self) -> EngineResult<usize> {
        Ok(self.read()?.employees.len())
    }

    pub fn direct_reports(&self, manager_id: &str) -> EngineResult<Vec<Employee>> {
        Ok(self
            .read()?
            .employees
            .values()
            .filter(|employee| employee.reporting_manager_id.as_deref() == Some(manager_id))
            .cloned()
            .collect())
    }

    /// Managers above `employee_id`, nearest first.
    pub fn manager_chain(&self, employee_id: &str) -> EngineResult<Vec<String>> {
        let state = self.read()?;
        if !state.employees.contains_key(employee_id) {
            return Err(EngineError::not_found("employee", employee_id));
        }
        Ok(hierarchy::manager_chain(employee_id, |id| state.manager_of(id))
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    // ==========================================
    // Projects
    // ==========================================

    /// Inserts or edits a project; `project_code` must stay unique.
    pub fn upsert_project(&self, project: Project) -> EngineResult<()> {
        project.validate()?;
        let mut state = self.write()?;

        let code_taken = state.projects.values().any(|existing| {
            existing.project_code == project.project_code
                && existing.project_id != project.project_id
        });
        if code_taken {
            return Err(EngineError::DuplicateProjectCode(project.project_code));
        }

        state.projects.insert(project.project_id.clone(), project);
        Ok(())
    }

    pub fn remove_project(&self, project_id: &str) -> EngineResult<Project> {
        self.write()?
            .projects
            .remove(project_id)
            .ok_or_else(|| EngineError::not_found("project", project_id))
    }

    pub fn project(&self, project_id: &str) -> EngineResult<Option<Project>> {
        Ok(self.read()?.projects.get(project_id).cloned())
    }

    pub fn project_by_code(&self, project_code: &str) -> EngineResult<Option<Project>> {
        Ok(self
            .read()?
            .projects
            .values()
            .find(|project| project.project_code == project_code)
            .cloned())
    }

    pub fn project_interval(&self, project_id: &str) -> EngineResult<CalendarInterval> {
        self.read()?
            .projects
            .get(project_id)
            .map(|project| project.interval)
            .ok_or_else(|| EngineError::not_found("project", project_id))
    }

    pub fn projects(&self) -> EngineResult<Vec<Project>> {
        Ok(self.read()?.projects.values().cloned().collect())
    }

    // ==========================================
    // Hiring requirements
    // ==========================================

    pub fn upsert_hiring_requirement(&self, requirement: HiringRequirement) -> EngineResult<()> {
        requirement.validate()?;
        let mut state = self.write()?;
        state.ensure_department(requirement.department_id.as_deref())?;
        state
            .hiring_requirements
            .insert(requirement.requirement_id.clone(), requirement);
        Ok(())
    }

    pub fn remove_hiring_requirement(&self, requirement_id: &str) -> EngineResult<HiringRequirement> {
        self.write()?
            .hiring_requirements
            .remove(requirement_id)
            .ok_or_else(|| EngineError::not_found("hiring_requirement", requirement_id))
    }

    pub fn hiring_requirements(&self) -> EngineResult<Vec<HiringRequirement>> {
        Ok(self.read()?.hiring_requirements.values().cloned().collect())
    }

    // ==========================================
    // Reference checks
    // ==========================================

    /// Confirms the employee, project and role of an assignment exist.
    pub fn ensure_assignment_refs(
        &self,
        employee_id: &str,
        project_id: &str,
        role_id: &str,
    ) -> EngineResult<()> {
        let state = self.read()?;
        if !state.employees.contains_key(employee_id) {
            return Err(EngineError::not_found("employee", employee_id));
        }
        if !state.projects.contains_key(project_id) {
            return Err(EngineError::not_found("project", project_id));
        }
        if !state.roles.contains_key(role_id) {
            return Err(EngineError::not_found("role", role_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UrgencyLevel;
    use chrono::NaiveDate;

    fn project(id: &str, code: &str) -> Project {
        let interval = CalendarInterval::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        )
        .unwrap();
        Project::new(id, code, "Portal", "Acme", interval)
    }

    fn employee(id: &str) -> Employee {
        Employee::new(id, id.to_uppercase(), "Engineer", format!("{}@example.com", id))
    }

    #[test]
    fn test_duplicate_project_code_rejected() {
        let directory = ReferenceDirectory::new();
        directory.upsert_project(project("P1", "PRJ-1")).unwrap();
        // editing the same project keeps its code
        directory.upsert_project(project("P1", "PRJ-1")).unwrap();

        let err = directory.upsert_project(project("P2", "PRJ-1")).unwrap_err();
        assert_eq!(err, EngineError::DuplicateProjectCode("PRJ-1".to_string()));
    }

    #[test]
    fn test_unknown_manager_is_not_found() {
        let directory = ReferenceDirectory::new();
        let err = directory
            .upsert_employee(employee("dev").with_manager("ghost"))
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { entity: "employee", .. }));
    }

    #[test]
    fn test_hierarchy_edit_closing_loop_rejected_and_unchanged() {
        let directory = ReferenceDirectory::new();
        directory.upsert_employee(employee("cto")).unwrap();
        directory.upsert_employee(employee("lead").with_manager("cto")).unwrap();
        directory.upsert_employee(employee("dev").with_manager("lead")).unwrap();

        let err = directory
            .upsert_employee(employee("cto").with_manager("dev"))
            .unwrap_err();
        assert!(matches!(err, EngineError::CyclicHierarchy { .. }));
        assert_eq!(directory.employee("cto").unwrap().unwrap().reporting_manager_id, None);

        assert_eq!(
            directory.manager_chain("dev").unwrap(),
            vec!["lead".to_string(), "cto".to_string()]
        );
    }

    #[test]
    fn test_remove_manager_detaches_reports() {
        let directory = ReferenceDirectory::new();
        directory.upsert_employee(employee("lead")).unwrap();
        directory.upsert_employee(employee("dev").with_manager("lead")).unwrap();
        assert_eq!(directory.direct_reports("lead").unwrap().len(), 1);

        directory.remove_employee("lead").unwrap();
        assert_eq!(directory.employee("dev").unwrap().unwrap().reporting_manager_id, None);
    }

    #[test]
    fn test_hiring_requirement_needs_known_department() {
        let directory = ReferenceDirectory::new();
        let mut requirement =
            HiringRequirement::new("H1", "Designer", 2, UrgencyLevel::Medium, "2 years");
        requirement.department_id = Some("D9".to_string());
        assert!(directory.upsert_hiring_requirement(requirement.clone()).is_err());

        directory.upsert_department(Department::new("D9", "Design")).unwrap();
        directory.upsert_hiring_requirement(requirement).unwrap();
        assert_eq!(directory.hiring_requirements().unwrap().len(), 1);
    }

    #[test]
    fn test_assignment_refs_checked() {
        let directory = ReferenceDirectory::new();
        directory.upsert_employee(employee("dev")).unwrap();
        directory.upsert_project(project("P1", "PRJ-1")).unwrap();
        assert!(matches!(
            directory.ensure_assignment_refs("dev", "P1", "R1").unwrap_err(),
            EngineError::NotFound { entity: "role", .. }
        ));
        directory.upsert_role(Role::new("R1", "Developer")).unwrap();
        assert!(directory.ensure_assignment_refs("dev", "P1", "R1").is_ok());
    }
}
