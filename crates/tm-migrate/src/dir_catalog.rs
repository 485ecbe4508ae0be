//! Directory-backed catalog of SQL migration files.
//!
//! Every `<identifier>.sql` file in the directory is one migration. Marker
//! comments on their own line split the file into sections:
//!
//! ```sql
//! -- tidemark:idempotent
//! -- tidemark:up
//! CREATE TABLE IF NOT EXISTS users (id INTEGER);
//! -- tidemark:down
//! DROP TABLE users;
//! ```
//!
//! Text before the first section is ignored.

use crate::action::{Action, ActionError};
use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::unit::MigrationUnit;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tm_core::MigrationId;
use tm_db::Database;

/// File extension of migration files
pub const MIGRATION_EXTENSION: &str = "sql";

/// Prefix shared by every section marker
pub const MARKER_PREFIX: &str = "-- tidemark:";

/// Body of a parsed migration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigration {
    /// Forward SQL
    pub up: String,
    /// Reverse SQL; `None` when the section is absent or blank
    pub down: Option<String>,
    /// Whether the file carries the idempotent marker
    pub idempotent: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Up,
    Down,
}

/// Parse the text of a migration file
pub fn parse_sql_migration(content: &str) -> Result<SqlMigration, String> {
    let mut up: Option<String> = None;
    let mut down: Option<String> = None;
    let mut idempotent = false;
    let mut section = Section::Header;

    for line in content.lines() {
        if let Some(directive) = line.trim().strip_prefix(MARKER_PREFIX) {
            match directive.trim() {
                "up" if up.is_some() => return Err("duplicate 'up' section".to_string()),
                "down" if down.is_some() => return Err("duplicate 'down' section".to_string()),
                "up" => {
                    up = Some(String::new());
                    section = Section::Up;
                }
                "down" => {
                    down = Some(String::new());
                    section = Section::Down;
                }
                "idempotent" => idempotent = true,
                other => return Err(format!("unknown directive '{}{}'", MARKER_PREFIX, other)),
            }
            continue;
        }

        let target = match section {
            Section::Header => None,
            Section::Up => up.as_mut(),
            Section::Down => down.as_mut(),
        };
        if let Some(buf) = target {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    let up = up.ok_or_else(|| format!("missing '{}up' section", MARKER_PREFIX))?;
    if up.trim().is_empty() {
        return Err("'up' section is empty".to_string());
    }
    Ok(SqlMigration {
        up,
        down: down.filter(|sql| !sql.trim().is_empty()),
        idempotent,
    })
}

/// Wrap a SQL script as a direct-convention action
fn sql_action(sql: String) -> Action {
    let sql: Arc<str> = sql.into();
    Action::direct(move |db: Arc<dyn Database>| {
        let sql = Arc::clone(&sql);
        async move {
            db.execute_batch(&sql).await?;
            Ok::<_, ActionError>(())
        }
    })
}

/// Catalog reading `*.sql` files from one directory
#[derive(Debug, Clone)]
pub struct DirCatalog {
    dir: PathBuf,
}

impl DirCatalog {
    /// Create a catalog over `dir`. The directory is read lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The migrations directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `id`
    pub fn path_for(&self, id: &MigrationId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", id.as_str(), MIGRATION_EXTENSION))
    }
}

impl Catalog for DirCatalog {
    fn list_identifiers(&self) -> CatalogResult<Vec<MigrationId>> {
        let io_err = |source| CatalogError::Io {
            path: self.dir.display().to_string(),
            source,
        };

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(MIGRATION_EXTENSION)
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let id = MigrationId::try_new(stem).map_err(|source| CatalogError::InvalidName {
                path: path.display().to_string(),
                source,
            })?;
            ids.push(id);
        }
        ids.sort();
        Ok(ids)
    }

    fn load_unit(&self, id: &MigrationId) -> CatalogResult<MigrationUnit> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(CatalogError::NotFound { id: id.clone() });
        }
        let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed = parse_sql_migration(&content).map_err(|message| CatalogError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        let mut unit = MigrationUnit::new(sql_action(parsed.up)).with_idempotent(parsed.idempotent);
        if let Some(down) = parsed.down {
            unit = unit.with_down(sql_action(down));
        }
        Ok(unit)
    }
}

#[cfg(test)]
#[path = "dir_catalog_test.rs"]
mod tests;
