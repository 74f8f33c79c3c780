// ==========================================
// Resource Planner - core library
// ==========================================
// Resource allocation engine behind the resource-management dashboard:
// hard/soft capacity checks on project assignments, reference data,
// SQLite persistence and dashboard read models.
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value objects
pub mod domain;

// Engine layer - allocation rules
pub mod engine;

// Repository layer - data access
pub mod repository;

// Configuration layer
pub mod config;

// SQLite connection setup and schema
pub mod db;

// Logging
pub mod logging;

// API layer - service entry points
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    Assignment, AssignmentDraft, CalendarInterval, Department, Employee, HiringRequirement,
    LockType, Project, ProjectStatus, Role, UrgencyLevel, Utilization, UtilizationBand,
};

pub use engine::{
    AllocationEvent, AllocationEventKind, AllocationEventPublisher, AllocationWarning,
    AssignmentLedger, AssignmentQuery, ConflictResolver, ReferenceDirectory, Rejection,
    UtilizationAccumulator, UtilizationSummary, Verdict,
};

pub use config::{AllocationPolicy, ConfigManager};

pub use api::{AllocationApi, ApiError, ApiResult, CommitReceipt, DashboardApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Resource Planner";
