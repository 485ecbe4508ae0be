//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tm_core::Config;
use tm_db::{Database, DuckDbBackend};
use tm_migrate::{DirCatalog, Migrator};

use crate::cli::GlobalArgs;

/// Migrator wired to the project's migrations directory and database
pub(crate) struct RuntimeContext {
    /// Engine bound to the migrations directory and database
    pub(crate) migrator: Migrator,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);
        let config = load_config(args)?;

        let db_path = config
            .database_path(args.target.as_deref())
            .context("Failed to resolve database path")?;
        let db_path = resolve_db_path(&root, &db_path);
        log::debug!("Opening database {}", db_path);
        let db: Arc<dyn Database> =
            Arc::new(DuckDbBackend::new(&db_path).context("Failed to connect to database")?);

        let migrations_dir = config
            .migrations_dir_absolute(&root)
            .context("Failed to resolve migrations directory")?;
        let table = config
            .changelog_table()
            .context("Failed to resolve changelog table")?;

        let migrator = Migrator::new(Arc::new(DirCatalog::new(migrations_dir)), db, table);

        Ok(Self { migrator })
    }
}

/// Load config from `--config` or the project directory
pub(crate) fn load_config(args: &GlobalArgs) -> Result<Config> {
    match &args.config {
        Some(path) => {
            Config::load(Path::new(path)).context("Failed to load configuration file")
        }
        None => Config::load_from_dir(Path::new(&args.project_dir))
            .context("Failed to load project configuration"),
    }
}

/// Relative database files live under the project root
fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
