//! Error types for tm-migrate

use crate::action::ActionError;
use std::fmt;
use thiserror::Error;
use tm_core::{CoreError, MigrationId};
use tm_db::DbError;

/// Which way an action moves the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward action
    Up,
    /// Reverse action
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// Errors raised by a [`Catalog`](crate::Catalog)
#[derive(Error, Debug)]
pub enum CatalogError {
    /// C001: No unit for the identifier
    #[error("[C001] Migration {id} not found")]
    NotFound { id: MigrationId },

    /// C002: Reading the catalog failed
    #[error("[C002] Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// C003: A migration file could not be parsed
    #[error("[C003] Invalid migration file '{path}': {message}")]
    Parse { path: String, message: String },

    /// C004: A file name is not a usable identifier
    #[error("[C004] Invalid migration file name '{path}': {source}")]
    InvalidName { path: String, source: CoreError },
}

/// Result type alias for CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Engine errors. Each names the migration and the phase that failed.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// MG001: Unknown identifier
    #[error("[MG001] Migration {id} not found")]
    NotFound { id: MigrationId },

    /// MG002: Single run of a migration not marked idempotent
    #[error("[MG002] Could not run non-idempotent migration {id}")]
    PolicyViolation { id: MigrationId },

    /// MG003: The catalog could not load the unit
    #[error("[MG003] Could not load migration {id}: {source}")]
    Load { id: MigrationId, source: CatalogError },

    /// MG004: Revert requested for a unit without a reverse action
    #[error("[MG004] Could not migrate down {id}: no down action defined")]
    MissingDownAction { id: MigrationId },

    /// MG005: The action failed or never signalled completion
    #[error("[MG005] Could not migrate {direction} {id}: {source}")]
    ActionFailure {
        id: MigrationId,
        direction: Direction,
        source: ActionError,
    },

    /// MG006: The action ran but the changelog write failed
    #[error("[MG006] Could not update changelog for {id}: {source}")]
    PersistenceFailure { id: MigrationId, source: DbError },

    /// Catalog listing failed during reconciliation
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Changelog read failed during reconciliation
    #[error(transparent)]
    Database(#[from] DbError),
}

impl MigrateError {
    /// The migration the error is about, if it concerns a single one
    pub fn id(&self) -> Option<&MigrationId> {
        match self {
            MigrateError::NotFound { id }
            | MigrateError::PolicyViolation { id }
            | MigrateError::Load { id, .. }
            | MigrateError::MissingDownAction { id }
            | MigrateError::ActionFailure { id, .. }
            | MigrateError::PersistenceFailure { id, .. } => Some(id),
            MigrateError::Catalog(_) | MigrateError::Database(_) => None,
        }
    }

    /// Short name of the phase that failed
    pub fn phase(&self) -> &'static str {
        match self {
            MigrateError::NotFound { .. } => "not-found",
            MigrateError::PolicyViolation { .. } => "policy",
            MigrateError::Load { .. } | MigrateError::MissingDownAction { .. } => "load",
            MigrateError::ActionFailure { .. } => "action",
            MigrateError::PersistenceFailure { .. } => "persistence",
            MigrateError::Catalog(_) => "catalog",
            MigrateError::Database(_) => "changelog",
        }
    }
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

/// A batch that stopped early.
///
/// `completed` lists, in execution order, the migrations committed to the
/// changelog before `error` occurred.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct BatchError {
    /// Identifiers fully processed before the failure
    pub completed: Vec<MigrationId>,

    /// The failure that stopped the batch
    pub error: MigrateError,
}
