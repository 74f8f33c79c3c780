// ==========================================
// Resource Planner - engine layer
// ==========================================
// Allocation rules over in-memory state; no SQL here.
// Every rejection carries the figures that caused it.
// ==========================================

pub mod directory;
pub mod error;
pub mod events;
pub mod hierarchy;
pub mod ledger;
pub mod resolver;
pub mod utilization;

pub use directory::ReferenceDirectory;
pub use error::{EngineError, EngineResult};
pub use events::{
    AllocationEvent, AllocationEventKind, AllocationEventPublisher, NoOpEventPublisher,
    OptionalEventPublisher,
};
pub use ledger::{AssignmentLedger, AssignmentQuery};
pub use resolver::{AllocationWarning, ConflictResolver, Rejection, RejectionKind, Verdict};
pub use utilization::{LoadSegment, UtilizationAccumulator, UtilizationSummary};
