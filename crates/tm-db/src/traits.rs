//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use tm_core::{ChangelogEntry, MigrationId};

/// Database handle passed to every migration action
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Return the first column of the first row rendered as text, `None` for
    /// SQL NULL or an empty result
    async fn query_one(&self, sql: &str) -> DbResult<Option<String>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Append one entry to the changelog table, creating the table if needed
    async fn insert_changelog_entry(&self, table: &str, entry: &ChangelogEntry) -> DbResult<()>;

    /// Remove every changelog entry for `id`, returning how many were removed
    async fn remove_changelog_entries(&self, table: &str, id: &MigrationId) -> DbResult<usize>;

    /// List the changelog ordered by `applied_at`, then identifier
    async fn list_changelog_entries(&self, table: &str) -> DbResult<Vec<ChangelogEntry>>;
}
