// ==========================================
// Resource Planner - configuration layer
// ==========================================
// Storage: config_kv table, global scope
// ==========================================

pub mod allocation_policy;
pub mod config_manager;

pub use allocation_policy::AllocationPolicy;
pub use config_manager::{config_keys, ConfigManager};
