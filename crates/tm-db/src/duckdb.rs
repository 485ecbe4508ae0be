//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::types::Value;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tm_core::{ChangelogEntry, MigrationId};

/// Format used to bind `applied_at` into a `TIMESTAMP` column
const TIMESTAMP_BIND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(DbError::from)?;
        Ok(count as usize)
    }

    fn query_one_sync(&self, sql: &str) -> DbResult<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(value_to_text(row.get::<_, Value>(0)?)),
            None => Ok(None),
        }
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;

        Ok(count > 0)
    }

    /// Create the changelog table (and its schema) if missing
    fn ensure_changelog_sync(conn: &Connection, table: &str) -> DbResult<()> {
        tm_core::config::validate_table_name(table)
            .map_err(|_| DbError::InvalidIdentifier(table.to_string()))?;
        if let Some((schema, _)) = table.split_once('.') {
            conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))?;
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 file_name  VARCHAR   NOT NULL,
                 applied_at TIMESTAMP NOT NULL,
                 method     VARCHAR   NOT NULL
             )",
            table
        ))?;
        Ok(())
    }

    fn insert_changelog_sync(&self, table: &str, entry: &ChangelogEntry) -> DbResult<()> {
        let conn = self.lock()?;
        Self::ensure_changelog_sync(&conn, table)?;
        let applied_at = entry.applied_at.format(TIMESTAMP_BIND_FORMAT).to_string();
        conn.execute(
            &format!(
                "INSERT INTO {} (file_name, applied_at, method) VALUES (?, CAST(? AS TIMESTAMP), ?)",
                table
            ),
            duckdb::params![entry.file_name.as_str(), applied_at, entry.method.as_str()],
        )?;
        Ok(())
    }

    fn remove_changelog_sync(&self, table: &str, id: &MigrationId) -> DbResult<usize> {
        let conn = self.lock()?;
        Self::ensure_changelog_sync(&conn, table)?;
        let removed = conn.execute(
            &format!("DELETE FROM {} WHERE file_name = ?", table),
            duckdb::params![id.as_str()],
        )?;
        Ok(removed)
    }

    fn list_changelog_sync(&self, table: &str) -> DbResult<Vec<ChangelogEntry>> {
        let conn = self.lock()?;
        Self::ensure_changelog_sync(&conn, table)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT file_name, CAST(applied_at AS VARCHAR), method FROM {} ORDER BY applied_at, file_name",
            table
        ))?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(file_name, applied_at, method)| {
                let file_name =
                    MigrationId::try_new(file_name).map_err(|e| DbError::DecodeError(e.to_string()))?;
                let applied_at = parse_timestamp(&applied_at)?;
                let method = method.parse().map_err(DbError::DecodeError)?;
                Ok(ChangelogEntry {
                    file_name,
                    applied_at,
                    method,
                })
            })
            .collect()
    }
}

/// Parse the text form of a DuckDB `TIMESTAMP`
fn parse_timestamp(text: &str) -> DbResult<DateTime<Utc>> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DbError::DecodeError(format!("unrecognized timestamp '{}'", text)))
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Boolean(b) => Some(b.to_string()),
        Value::TinyInt(n) => Some(n.to_string()),
        Value::SmallInt(n) => Some(n.to_string()),
        Value::Int(n) => Some(n.to_string()),
        Value::BigInt(n) => Some(n.to_string()),
        Value::HugeInt(n) => Some(n.to_string()),
        Value::UTinyInt(n) => Some(n.to_string()),
        Value::USmallInt(n) => Some(n.to_string()),
        Value::UInt(n) => Some(n.to_string()),
        Value::UBigInt(n) => Some(n.to_string()),
        Value::Float(n) => Some(n.to_string()),
        Value::Double(n) => Some(n.to_string()),
        Value::Text(s) => Some(s),
        other => Some(format!("{:?}", other)),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn query_one(&self, sql: &str) -> DbResult<Option<String>> {
        self.query_one_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    async fn insert_changelog_entry(&self, table: &str, entry: &ChangelogEntry) -> DbResult<()> {
        log::debug!("Recording {} ({}) in {}", entry.file_name, entry.method, table);
        self.insert_changelog_sync(table, entry)
    }

    async fn remove_changelog_entries(&self, table: &str, id: &MigrationId) -> DbResult<usize> {
        log::debug!("Removing {} from {}", id, table);
        self.remove_changelog_sync(table, id)
    }

    async fn list_changelog_entries(&self, table: &str) -> DbResult<Vec<ChangelogEntry>> {
        self.list_changelog_sync(table)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
