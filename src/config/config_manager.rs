// ==========================================
// Resource Planner - configuration manager
// ==========================================
// Storage: config_kv table (key-value + scope)
// Only the 'global' scope is read today
// ==========================================

use crate::config::allocation_policy::AllocationPolicy;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const GLOBAL_SCOPE: &str = "global";

pub mod config_keys {
    pub const CAPACITY_LIMIT_PCT: &str = "allocation.capacity_limit_pct";
    pub const HIGH_THRESHOLD_PCT: &str = "utilization.high_threshold_pct";
    pub const ELEVATED_THRESHOLD_PCT: &str = "utilization.elevated_threshold_pct";
}

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Reapplies the shared PRAGMAs to the passed connection (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(key, value, "config value updated");
        Ok(())
    }

    /// Reads a percentage key; absent keys yield `default`, unparsable ones an error.
    fn get_pct_or(&self, key: &str, default: u32) -> RepositoryResult<u32> {
        match self.get_value(key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| RepositoryError::FieldValueError {
                    field: key.to_string(),
                    message: format!("expected a non-negative integer, got `{}`: {}", raw, e),
                }),
        }
    }

    pub fn load_allocation_policy(&self) -> RepositoryResult<AllocationPolicy> {
        let defaults = AllocationPolicy::default();
        let policy = AllocationPolicy {
            capacity_limit_pct: self
                .get_pct_or(config_keys::CAPACITY_LIMIT_PCT, defaults.capacity_limit_pct)?,
            high_threshold_pct: self
                .get_pct_or(config_keys::HIGH_THRESHOLD_PCT, defaults.high_threshold_pct)?,
            elevated_threshold_pct: self.get_pct_or(
                config_keys::ELEVATED_THRESHOLD_PCT,
                defaults.elevated_threshold_pct,
            )?,
        };

        if !policy.is_consistent() {
            return Err(RepositoryError::ValidationError(format!(
                "elevated threshold {} is above high threshold {}",
                policy.elevated_threshold_pct, policy.high_threshold_pct
            )));
        }

        tracing::debug!(?policy, "allocation policy loaded");
        Ok(policy)
    }

    /// All global keys as a JSON object string.
    pub fn config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_empty() {
        let policy = manager().load_allocation_policy().unwrap();
        assert_eq!(policy, AllocationPolicy::default());
    }

    #[test]
    fn test_overrides_are_read() {
        let config = manager();
        config.set_value(config_keys::CAPACITY_LIMIT_PCT, "120").unwrap();
        config.set_value(config_keys::HIGH_THRESHOLD_PCT, " 95 ").unwrap();

        let policy = config.load_allocation_policy().unwrap();
        assert_eq!(policy.capacity_limit_pct, 120);
        assert_eq!(policy.high_threshold_pct, 95);
        assert_eq!(policy.elevated_threshold_pct, 70);
    }

    #[test]
    fn test_unparsable_value_is_an_error() {
        let config = manager();
        config.set_value(config_keys::CAPACITY_LIMIT_PCT, "lots").unwrap();
        let err = config.load_allocation_policy().unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { .. }));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = manager();
        config.set_value(config_keys::ELEVATED_THRESHOLD_PCT, "95").unwrap();
        config.set_value(config_keys::HIGH_THRESHOLD_PCT, "90").unwrap();
        assert!(matches!(
            config.load_allocation_policy().unwrap_err(),
            RepositoryError::ValidationError(_)
        ));
    }

    #[test]
    fn test_snapshot_lists_keys() {
        let config = manager();
        config.set_value("b.key", "2").unwrap();
        config.set_value("a.key", "1").unwrap();
        let snapshot: serde_json::Value =
            serde_json::from_str(&config.config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["a.key"], "1");
        assert_eq!(snapshot["b.key"], "2");
    }
}
