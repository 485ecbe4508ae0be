//! tm-migrate - Migration engine for Tidemark
//!
//! Reconciles a migration [`Catalog`] against the changelog stored in the
//! database, applies pending migrations in identifier order, reverts the most
//! recent ones, and force-runs idempotent migrations on demand.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tm_db::DuckDbBackend;
//! use tm_migrate::{Action, MemoryCatalog, MigrationUnit, Migrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = MemoryCatalog::new().with(
//!     "20240120120000-create_users",
//!     MigrationUnit::new(Action::direct(|db| async move {
//!         db.execute_batch("CREATE TABLE users (id INTEGER)").await?;
//!         Ok::<_, tm_migrate::ActionError>(())
//!     })),
//! );
//! let db = Arc::new(DuckDbBackend::in_memory()?);
//! let migrator = Migrator::new(Arc::new(catalog), db, "changelog");
//! let migrated = migrator.up().await?;
//! assert_eq!(migrated.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod catalog;
mod changelog;
pub mod dir_catalog;
mod engine;
pub mod error;
pub mod migrator;
mod single_run;
pub mod status;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod unit;

pub use action::{Action, ActionError, ActionResult, Convention, Done};
pub use catalog::{Catalog, MemoryCatalog};
pub use dir_catalog::{parse_sql_migration, DirCatalog, SqlMigration};
pub use error::{BatchError, CatalogError, CatalogResult, Direction, MigrateError, MigrateResult};
pub use migrator::{Migrator, StatusReport};
pub use status::{orphaned_entries, reconcile};
pub use unit::MigrationUnit;
