// ==========================================
// Resource Planner - API layer
// ==========================================
// Entry points for the UI / service layer
// ==========================================

pub mod allocation_api;
pub mod dashboard_api;
pub mod error;
pub mod persistence_adapter;

pub use allocation_api::{AllocationApi, CommitReceipt};
pub use dashboard_api::{DashboardApi, DashboardSummary, EmployeeLoad, RosterEntry};
pub use error::{ApiError, ApiResult};
pub use persistence_adapter::RepositoryEventPublisher;
