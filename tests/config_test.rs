// ==========================================
// Configuration
// ==========================================
// ConfigManager over a file database feeding AllocationApi
// ==========================================


#[cfg(test)]
mod config_test {
    use resource_planner::api::{AllocationApi, ApiError};
    use resource_planner::config::{config_keys, AllocationPolicy, ConfigManager};
    use resource_planner::domain::LockType;
    use resource_planner::engine::Verdict;
    use resource_planner::repository::RepositoryError;

    use crate::test_helpers::{create_test_db, d, draft, interval, seeded_directory};

    #[test]
    fn test_defaults_without_rows() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let config = ConfigManager::new(&db_path).unwrap();
        assert_eq!(
            config.load_allocation_policy().unwrap(),
            AllocationPolicy::default()
        );
        assert_eq!(config.config_snapshot().unwrap(), "{}");
    }

    #[test]
    fn test_capacity_limit_from_config_drives_resolver() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let config = ConfigManager::new(&db_path).unwrap();
        config
            .set_value(config_keys::CAPACITY_LIMIT_PCT, "80")
            .unwrap();

        let policy = config.load_allocation_policy().unwrap();
        assert_eq!(policy.capacity_limit_pct, 80);

        let api = AllocationApi::new(seeded_directory(), policy, None);
        api.commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 60, LockType::Hard))
            .unwrap();

        let verdict = api
            .propose(&draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 25, LockType::Hard))
            .unwrap();
        assert!(matches!(verdict, Verdict::Rejected(ref r) if r.limit_pct == 80));

        let err = api
            .commit(draft("bob", "P-WEB", interval(d(1, 1), d(1, 31)), 25, LockType::Hard))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
    }

    #[test]
    fn test_values_survive_reopen_and_snapshot_lists_them() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        {
            let config = ConfigManager::new(&db_path).unwrap();
            config
                .set_value(config_keys::HIGH_THRESHOLD_PCT, "95")
                .unwrap();
            config
                .set_value(config_keys::HIGH_THRESHOLD_PCT, "85")
                .unwrap();
        }

        let config = ConfigManager::new(&db_path).unwrap();
        assert_eq!(
            config.get_value(config_keys::HIGH_THRESHOLD_PCT).unwrap(),
            Some("85".to_string())
        );

        let snapshot: serde_json::Value =
            serde_json::from_str(&config.config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::HIGH_THRESHOLD_PCT], "85");
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let config = ConfigManager::new(&db_path).unwrap();

        config
            .set_value(config_keys::CAPACITY_LIMIT_PCT, "lots")
            .unwrap();
        assert!(matches!(
            config.load_allocation_policy().unwrap_err(),
            RepositoryError::FieldValueError { .. }
        ));

        config
            .set_value(config_keys::CAPACITY_LIMIT_PCT, "100")
            .unwrap();
        config
            .set_value(config_keys::ELEVATED_THRESHOLD_PCT, "95")
            .unwrap();
        assert!(matches!(
            config.load_allocation_policy().unwrap_err(),
            RepositoryError::ValidationError(_)
        ));
    }
}
