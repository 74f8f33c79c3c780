// ==========================================
// Resource Planner - domain layer
// ==========================================
// Entities, value objects and their local validation
// No engine logic, no data access
// ==========================================

pub mod assignment;
pub mod error;
pub mod hiring;
pub mod interval;
pub mod organization;
pub mod project;
pub mod types;

pub use assignment::{Assignment, AssignmentDraft, Utilization, MAX_UTILIZATION_PCT};
pub use error::{DomainError, DomainResult};
pub use hiring::HiringRequirement;
pub use interval::CalendarInterval;
pub use organization::{Department, Employee, Role};
pub use project::Project;
pub use types::{LockType, ProjectStatus, UrgencyLevel, UtilizationBand};
