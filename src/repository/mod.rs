// ==========================================
// Resource Planner - repository layer
// ==========================================
// Rule: no business logic in repositories
// All queries are parameterized
// ==========================================

pub mod assignment_repo;
pub mod error;

pub use assignment_repo::AssignmentRepository;
pub use error::{RepositoryError, RepositoryResult};
