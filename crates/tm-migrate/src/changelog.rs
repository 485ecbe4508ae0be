//! Changelog record helpers shared by the engine and the single-run invoker

use crate::error::{MigrateError, MigrateResult};
use std::sync::Arc;
use tm_core::{ChangelogEntry, Method, MigrationId};
use tm_db::{Database, DbResult};

/// The changelog table reached through the database handle
pub(crate) struct Changelog {
    db: Arc<dyn Database>,
    table: String,
}

impl Changelog {
    pub(crate) fn new(db: Arc<dyn Database>, table: String) -> Self {
        Self { db, table }
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    /// Every entry, ordered by `applied_at`
    pub(crate) async fn entries(&self) -> DbResult<Vec<ChangelogEntry>> {
        self.db.list_changelog_entries(&self.table).await
    }

    /// Append an entry stamped now
    pub(crate) async fn record(
        &self,
        id: &MigrationId,
        method: Method,
    ) -> MigrateResult<ChangelogEntry> {
        let entry = ChangelogEntry::now(id.clone(), method);
        self.db
            .insert_changelog_entry(&self.table, &entry)
            .await
            .map_err(|source| MigrateError::PersistenceFailure {
                id: id.clone(),
                source,
            })?;
        Ok(entry)
    }

    /// Drop the entries for `id`
    pub(crate) async fn remove(&self, id: &MigrationId) -> MigrateResult<()> {
        let removed = self
            .db
            .remove_changelog_entries(&self.table, id)
            .await
            .map_err(|source| MigrateError::PersistenceFailure {
                id: id.clone(),
                source,
            })?;
        if removed == 0 {
            log::warn!("No changelog entry for {} in {}", id, self.table);
        }
        Ok(())
    }
}
