//! The `Migrator`: shared state for reconciliation, batch execution, and
//! single runs.
//!
//! All operations on one `Migrator` are serialised by an async batch lock so
//! two batches can never interleave against the same changelog. Separate
//! processes are kept apart by DuckDB's single-writer file lock.

use crate::catalog::Catalog;
use crate::changelog::Changelog;
use crate::error::{CatalogError, MigrateError, MigrateResult};
use crate::status::{orphaned_entries, reconcile};
use crate::unit::PreparedUnit;
use std::sync::Arc;
use tm_core::{ChangelogEntry, MigrationId, StatusItem};
use tm_db::Database;
use tokio::sync::{Mutex, MutexGuard};

/// Reconciliation output plus changelog history the catalog no longer knows
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// One item per catalog identifier, ascending
    pub items: Vec<StatusItem>,
    /// Changelog entries without a catalog unit
    pub orphaned: Vec<ChangelogEntry>,
}

/// Migration engine bound to a catalog, a database, and a changelog table
pub struct Migrator {
    pub(crate) catalog: Arc<dyn Catalog>,
    pub(crate) db: Arc<dyn Database>,
    pub(crate) changelog: Changelog,
    batch_lock: Mutex<()>,
}

impl Migrator {
    /// Create a migrator. `changelog_table` comes from configuration.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        db: Arc<dyn Database>,
        changelog_table: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            changelog: Changelog::new(Arc::clone(&db), changelog_table.into()),
            db,
            batch_lock: Mutex::new(()),
        }
    }

    /// The database handle actions receive
    pub fn database(&self) -> &Arc<dyn Database> {
        &self.db
    }

    /// Name of the changelog table
    pub fn changelog_table(&self) -> &str {
        self.changelog.table()
    }

    /// Ordered applied/pending view of the catalog.
    ///
    /// Catalog and changelog failures are returned unchanged.
    pub async fn status(&self) -> MigrateResult<Vec<StatusItem>> {
        let _batch = self.lock_batch().await;
        self.reconcile_now().await
    }

    /// Like [`status`](Self::status), also listing orphaned changelog history
    pub async fn status_report(&self) -> MigrateResult<StatusReport> {
        let _batch = self.lock_batch().await;
        let ids = self.catalog.list_identifiers()?;
        let entries = self.changelog.entries().await?;
        let orphaned: Vec<ChangelogEntry> = orphaned_entries(&ids, &entries)
            .into_iter()
            .cloned()
            .collect();
        for entry in &orphaned {
            log::warn!(
                "Changelog entry {} has no migration in the catalog",
                entry.file_name
            );
        }
        Ok(StatusReport {
            items: reconcile(&ids, &entries),
            orphaned,
        })
    }

    pub(crate) async fn lock_batch(&self) -> MutexGuard<'_, ()> {
        self.batch_lock.lock().await
    }

    /// Reconcile without taking the batch lock; callers must hold it
    pub(crate) async fn reconcile_now(&self) -> MigrateResult<Vec<StatusItem>> {
        let ids = self.catalog.list_identifiers()?;
        let entries = self.changelog.entries().await?;
        Ok(reconcile(&ids, &entries))
    }

    /// Load a unit and adapt its actions to the engine's async shape
    pub(crate) fn load(&self, id: &MigrationId) -> MigrateResult<PreparedUnit> {
        log::debug!("Loading migration {}", id);
        match self.catalog.load_unit(id) {
            Ok(unit) => Ok(PreparedUnit::from(unit)),
            Err(CatalogError::NotFound { id }) => Err(MigrateError::NotFound { id }),
            Err(source) => Err(MigrateError::Load {
                id: id.clone(),
                source,
            }),
        }
    }
}
