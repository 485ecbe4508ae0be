//! Single run of an explicitly named, idempotent migration.
//!
//! The changelog is not consulted: the migration runs whether or not it was
//! applied before, and each run appends a `run` entry.

use crate::error::{Direction, MigrateError, MigrateResult};
use crate::migrator::Migrator;
use std::sync::Arc;
use tm_core::{ChangelogEntry, Method, MigrationId};

impl Migrator {
    /// Run the forward action of `id` once and record it with method `run`.
    ///
    /// Fails with [`MigrateError::NotFound`] for an unknown identifier and
    /// with [`MigrateError::PolicyViolation`] when the unit is not marked
    /// idempotent; neither case invokes an action or writes the changelog.
    pub async fn run(&self, id: &MigrationId) -> MigrateResult<ChangelogEntry> {
        let _batch = self.lock_batch().await;

        let unit = self.load(id)?;
        if !unit.idempotent {
            return Err(MigrateError::PolicyViolation { id: id.clone() });
        }

        (unit.up)(Arc::clone(&self.db))
            .await
            .map_err(|source| MigrateError::ActionFailure {
                id: id.clone(),
                direction: Direction::Up,
                source,
            })?;

        let entry = self.changelog.record(id, Method::Run).await?;
        log::info!("MIGRATED UP (run): {}", id);
        Ok(entry)
    }
}

#[cfg(test)]
#[path = "single_run_test.rs"]
mod tests;
