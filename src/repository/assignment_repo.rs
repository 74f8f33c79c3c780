// ==========================================
// Resource Planner - assignment repository
// ==========================================
// Table: project_assignments
// Rule: data mapping only, capacity rules live in the engine
// ==========================================

use crate::domain::assignment::{Assignment, Utilization};
use crate::domain::interval::CalendarInterval;
use crate::domain::types::LockType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, employee_id, project_id, role_id, start_date, end_date,
        utilization_percentage, lock_type, created_at, updated_at
    FROM project_assignments
"#;

/// Raw column values before domain validation.
struct AssignmentRow {
    id: String,
    employee_id: String,
    project_id: String,
    role_id: String,
    start_date: String,
    end_date: String,
    utilization_percentage: u32,
    lock_type: String,
    created_at: String,
    updated_at: String,
}

impl AssignmentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            employee_id: row.get(1)?,
            project_id: row.get(2)?,
            role_id: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            utilization_percentage: row.get(6)?,
            lock_type: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_assignment(self) -> RepositoryResult<Assignment> {
        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        let interval = CalendarInterval::new(start, end).map_err(|e| field_error("end_date", e))?;
        let utilization = Utilization::new(self.utilization_percentage)
            .map_err(|e| field_error("utilization_percentage", e))?;
        let lock_type = self
            .lock_type
            .parse::<LockType>()
            .map_err(|e| field_error("lock_type", e))?;

        Ok(Assignment {
            assignment_id: self.id,
            employee_id: self.employee_id,
            project_id: self.project_id,
            role_id: self.role_id,
            interval,
            utilization,
            lock_type,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn field_error(field: &str, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn parse_date(field: &str, raw: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| field_error(field, e))
}

// fixed width so the TEXT column sorts chronologically
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| field_error(field, e))
}

// ==========================================
// AssignmentRepository
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Writes
    // ==========================================

    pub fn insert(&self, assignment: &Assignment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO project_assignments (
                id, employee_id, project_id, role_id, start_date, end_date,
                utilization_percentage, lock_type, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                assignment.assignment_id,
                assignment.employee_id,
                assignment.project_id,
                assignment.role_id,
                assignment.interval.start().format(DATE_FORMAT).to_string(),
                assignment.interval.end().format(DATE_FORMAT).to_string(),
                assignment.utilization.pct(),
                assignment.lock_type.as_str(),
                format_timestamp(&assignment.created_at),
                format_timestamp(&assignment.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Overwrites every mutable column of an existing row.
    pub fn update(&self, assignment: &Assignment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE project_assignments SET
                employee_id = ?2,
                project_id = ?3,
                role_id = ?4,
                start_date = ?5,
                end_date = ?6,
                utilization_percentage = ?7,
                lock_type = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
            params![
                assignment.assignment_id,
                assignment.employee_id,
                assignment.project_id,
                assignment.role_id,
                assignment.interval.start().format(DATE_FORMAT).to_string(),
                assignment.interval.end().format(DATE_FORMAT).to_string(),
                assignment.utilization.pct(),
                assignment.lock_type.as_str(),
                format_timestamp(&assignment.updated_at),
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "project_assignment".to_string(),
                id: assignment.assignment_id.clone(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, assignment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM project_assignments WHERE id = ?1",
            params![assignment_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "project_assignment".to_string(),
                id: assignment_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // Reads
    // ==========================================

    pub fn find_by_id(&self, assignment_id: &str) -> RepositoryResult<Option<Assignment>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![assignment_id], AssignmentRow::from_row)
            .optional()?;
        row.map(AssignmentRow::into_assignment).transpose()
    }

    /// All rows in creation order, ready for ledger hydration.
    pub fn find_all(&self) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY created_at, id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], AssignmentRow::from_row)?;
        rows.map(|row| row?.into_assignment()).collect()
    }

    pub fn find_by_employee(&self, employee_id: &str) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE employee_id = ?1 ORDER BY start_date, created_at",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![employee_id], AssignmentRow::from_row)?;
        rows.map(|row| row?.into_assignment()).collect()
    }
}
