// ==========================================
// Persistence adapter
// ==========================================
// AllocationApi -> RepositoryEventPublisher -> SQLite, plus
// an untouched ledger when the outbound sink refuses
// ==========================================


#[cfg(test)]
mod persistence_adapter_test {
    use resource_planner::api::{AllocationApi, ApiError, RepositoryEventPublisher};
    use resource_planner::config::AllocationPolicy;
    use resource_planner::domain::LockType;
    use resource_planner::engine::{
        AllocationEvent, AllocationEventKind, AllocationEventPublisher,
    };
    use resource_planner::repository::AssignmentRepository;
    use std::error::Error;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    use crate::test_helpers::{allocation_api, create_test_db, d, draft, interval, seeded_directory};

    fn setup() -> (NamedTempFile, Arc<AssignmentRepository>, Arc<AllocationApi>) {
        let (temp_file, db_path) = create_test_db().unwrap();
        let repo = Arc::new(AssignmentRepository::new(&db_path).unwrap());
        let publisher: Arc<dyn AllocationEventPublisher> =
            Arc::new(RepositoryEventPublisher::new(Arc::clone(&repo)));
        let api = allocation_api(Some(publisher));
        (temp_file, repo, api)
    }

    /// Refuses events while `failing` is set; records the kinds it accepted.
    #[derive(Default)]
    struct FlakyPublisher {
        failing: AtomicBool,
        accepted: Mutex<Vec<AllocationEventKind>>,
    }

    impl AllocationEventPublisher for FlakyPublisher {
        fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            if self.failing.load(Ordering::SeqCst) {
                return Err("sink unavailable".into());
            }
            self.accepted.lock().unwrap().push(event.kind);
            Ok(())
        }
    }

    // ==========================================
    // Write-through
    // ==========================================

    #[test]
    fn test_commit_and_release_are_persisted() {
        let (_temp_file, repo, api) = setup();

        let receipt = api
            .commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 80, LockType::Hard))
            .unwrap();
        let stored = repo.find_by_id(&receipt.assignment_id).unwrap().unwrap();
        assert_eq!(stored, api.get_assignment(&receipt.assignment_id).unwrap());

        api.release(&receipt.assignment_id).unwrap();
        assert!(repo.find_by_id(&receipt.assignment_id).unwrap().is_none());
    }

    #[test]
    fn test_lock_change_and_update_are_persisted() {
        let (_temp_file, repo, api) = setup();
        let receipt = api
            .commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 50, LockType::Soft))
            .unwrap();

        api.change_lock_type(&receipt.assignment_id, LockType::Hard)
            .unwrap();
        assert_eq!(
            repo.find_by_id(&receipt.assignment_id).unwrap().unwrap().lock_type,
            LockType::Hard
        );

        api.update_assignment(
            &receipt.assignment_id,
            draft("carol", "P-WEB", interval(d(2, 1), d(2, 14)), 30, LockType::Hard),
        )
        .unwrap();
        let stored = repo.find_by_id(&receipt.assignment_id).unwrap().unwrap();
        assert_eq!(stored.employee_id, "carol");
        assert_eq!(stored.utilization.pct(), 30);
        assert_eq!(stored.interval, interval(d(2, 1), d(2, 14)));
    }

    #[test]
    fn test_rejected_commit_is_never_persisted() {
        let (_temp_file, repo, api) = setup();
        api.commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 80, LockType::Hard))
            .unwrap();
        assert!(api
            .commit(draft("bob", "P-WEB", interval(d(1, 10), d(1, 20)), 30, LockType::Hard))
            .is_err());
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_hydrate_restores_ledger_from_database() {
        let (_temp_file, repo, api) = setup();
        api.commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 80, LockType::Hard))
            .unwrap();
        api.commit(draft("carol", "P-WEB", interval(d(1, 1), d(1, 31)), 20, LockType::Soft))
            .unwrap();

        // a fresh service over the same database
        let restarted = AllocationApi::new(seeded_directory(), AllocationPolicy::default(), None);
        assert_eq!(restarted.hydrate(repo.find_all().unwrap()).unwrap(), 2);
        assert_eq!(restarted.snapshot().unwrap(), api.snapshot().unwrap());

        // capacity is enforced against the restored state
        let err = restarted
            .commit(draft("bob", "P-WEB", interval(d(1, 15), d(2, 15)), 30, LockType::Hard))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
    }

    // ==========================================
    // Refused events
    // ==========================================

    #[test]
    fn test_refused_event_leaves_ledger_unchanged() {
        let flaky = Arc::new(FlakyPublisher::default());
        let api = allocation_api(Some(flaky.clone() as Arc<dyn AllocationEventPublisher>));

        let receipt = api
            .commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 50, LockType::Soft))
            .unwrap();
        let before = api.snapshot().unwrap();

        flaky.failing.store(true, Ordering::SeqCst);

        let err = api
            .commit(draft("bob", "P-WEB", interval(d(2, 1), d(2, 10)), 10, LockType::Hard))
            .unwrap_err();
        assert!(matches!(err, ApiError::PublishFailed(_)));

        let err = api
            .change_lock_type(&receipt.assignment_id, LockType::Hard)
            .unwrap_err();
        assert!(matches!(err, ApiError::PublishFailed(_)));

        let err = api
            .update_assignment(
                &receipt.assignment_id,
                draft("carol", "P-WEB", interval(d(3, 1), d(3, 5)), 10, LockType::Hard),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::PublishFailed(_)));

        let err = api.release(&receipt.assignment_id).unwrap_err();
        assert!(matches!(err, ApiError::PublishFailed(_)));

        assert_eq!(api.snapshot().unwrap(), before);

        flaky.failing.store(false, Ordering::SeqCst);
        api.release(&receipt.assignment_id).unwrap();
        assert_eq!(
            *flaky.accepted.lock().unwrap(),
            vec![AllocationEventKind::Committed, AllocationEventKind::Released]
        );
    }
}
