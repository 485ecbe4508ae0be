//! Batch execution: apply pending migrations, revert applied ones.
//!
//! Items run one at a time in identifier order. Each item goes through
//! load, execute, record; the first failure stops the batch and is returned
//! together with the identifiers already committed. A failed changelog write
//! after a successful action is reported as-is, the action is not undone.

use crate::error::{BatchError, Direction, MigrateError, MigrateResult};
use crate::migrator::Migrator;
use std::sync::Arc;
use tm_core::{Method, MigrationId};

impl Migrator {
    /// Apply every pending migration in ascending identifier order.
    ///
    /// Returns the identifiers migrated by this call, empty when nothing was
    /// pending.
    pub async fn up(&self) -> Result<Vec<MigrationId>, BatchError> {
        let _batch = self.lock_batch().await;
        let mut migrated = Vec::new();

        let pending: Vec<MigrationId> = match self.reconcile_now().await {
            Ok(items) => items
                .into_iter()
                .filter(|item| item.is_pending())
                .map(|item| item.file_name)
                .collect(),
            Err(error) => {
                return Err(BatchError {
                    completed: migrated,
                    error,
                })
            }
        };
        log::debug!("{} pending migration(s)", pending.len());

        for id in pending {
            if let Err(error) = self.migrate_up(&id).await {
                log::error!("{}", error);
                return Err(BatchError {
                    completed: migrated,
                    error,
                });
            }
            migrated.push(id);
        }
        Ok(migrated)
    }

    /// Revert up to `count` applied migrations, most recent identifier first.
    ///
    /// Returns the identifiers reverted by this call.
    pub async fn down(&self, count: usize) -> Result<Vec<MigrationId>, BatchError> {
        let _batch = self.lock_batch().await;
        let mut reverted = Vec::new();

        let applied: Vec<MigrationId> = match self.reconcile_now().await {
            Ok(items) => items
                .into_iter()
                .rev()
                .filter(|item| !item.is_pending())
                .take(count)
                .map(|item| item.file_name)
                .collect(),
            Err(error) => {
                return Err(BatchError {
                    completed: reverted,
                    error,
                })
            }
        };

        for id in applied {
            if let Err(error) = self.migrate_down(&id).await {
                log::error!("{}", error);
                return Err(BatchError {
                    completed: reverted,
                    error,
                });
            }
            reverted.push(id);
        }
        Ok(reverted)
    }

    async fn migrate_up(&self, id: &MigrationId) -> MigrateResult<()> {
        let unit = self.load(id)?;

        (unit.up)(Arc::clone(&self.db))
            .await
            .map_err(|source| MigrateError::ActionFailure {
                id: id.clone(),
                direction: Direction::Up,
                source,
            })?;

        self.changelog.record(id, Method::Up).await?;
        log::info!("MIGRATED UP: {}", id);
        Ok(())
    }

    async fn migrate_down(&self, id: &MigrationId) -> MigrateResult<()> {
        let unit = self.load(id)?;
        let down = unit
            .down
            .ok_or_else(|| MigrateError::MissingDownAction { id: id.clone() })?;

        down(Arc::clone(&self.db))
            .await
            .map_err(|source| MigrateError::ActionFailure {
                id: id.clone(),
                direction: Direction::Down,
                source,
            })?;

        self.changelog.remove(id).await?;
        log::info!("MIGRATED DOWN: {}", id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
