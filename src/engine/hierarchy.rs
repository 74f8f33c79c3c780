// ==========================================
// Resource Planner - reporting hierarchy checks
// ==========================================
// Run at edit time, before a manager change is stored.
// Invariant: following reporting_manager_id never revisits an employee.
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashSet;

/// Manager chain of `employee_id`, nearest manager first.
///
/// `manager_of` maps an employee to their manager. Traversal stops at the
/// top of the chain or, for already-corrupt data, at the first repeat.
pub fn manager_chain<'a, F>(employee_id: &'a str, manager_of: F) -> Vec<&'a str>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut chain = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(employee_id);

    let mut current = manager_of(employee_id);
    while let Some(manager_id) = current {
        if !seen.insert(manager_id) {
            break;
        }
        chain.push(manager_id);
        current = manager_of(manager_id);
    }
    chain
}

/// Fails with `CyclicHierarchy` when giving `employee_id` the manager
/// `new_manager_id` would close a loop.
pub fn ensure_acyclic<'a, F>(
    employee_id: &str,
    new_manager_id: Option<&'a str>,
    manager_of: F,
) -> EngineResult<()>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let Some(manager_id) = new_manager_id else {
        return Ok(());
    };

    let cyclic = manager_id == employee_id
        || manager_chain(manager_id, manager_of)
            .into_iter()
            .any(|ancestor| ancestor == employee_id);

    if cyclic {
        return Err(EngineError::CyclicHierarchy {
            employee_id: employee_id.to_string(),
            manager_id: manager_id.to_string(),
        });
    }
    Ok(())
}
