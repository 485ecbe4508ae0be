//! Create command implementation - writes a new timestamped migration file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tm_core::MigrationId;
use tm_migrate::dir_catalog::{MARKER_PREFIX, MIGRATION_EXTENSION};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::context::load_config;

/// Execute the create command
pub(crate) async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let migrations_dir = config.migrations_dir_absolute(Path::new(&global.project_dir))?;
    if !migrations_dir.is_dir() {
        anyhow::bail!(
            "Migrations directory '{}' does not exist. Run 'tm init' first.",
            migrations_dir.display()
        );
    }

    let description = args.description.join(" ");
    let id = MigrationId::timestamped(chrono::Utc::now(), &description)?;
    let path = migrations_dir.join(format!("{}.{}", id, MIGRATION_EXTENSION));
    if path.exists() {
        anyhow::bail!("Migration file '{}' already exists", path.display());
    }

    fs::write(&path, template(&description, args.idempotent))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

fn template(description: &str, idempotent: bool) -> String {
    let mut content = format!("-- {}\n", description);
    if idempotent {
        content.push_str(&format!("{}idempotent\n", MARKER_PREFIX));
    }
    content.push_str(&format!("{}up\n\n{}down\n\n", MARKER_PREFIX, MARKER_PREFIX));
    content
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
