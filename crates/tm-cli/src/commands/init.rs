//! Init command implementation - writes a default config and migrations directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tm_core::Config;

use crate::cli::{GlobalArgs, InitArgs};

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let project_dir = Path::new(&global.project_dir);
    let config_path = Config::config_path(project_dir, global.config.as_deref());
    Config::should_not_exist(&config_path)?;

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

    let content = config_template(&args.database_path);
    // Catch a bad --database-path before anything lands on disk
    let config = Config::parse(&content).context("Generated configuration is invalid")?;
    let migrations_dir = config.migrations_dir_absolute(project_dir)?;
    fs::create_dir_all(&migrations_dir)
        .with_context(|| format!("Failed to create directory: {}", migrations_dir.display()))?;

    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("Created {}", migrations_dir.display());
    Ok(())
}

fn config_template(database_path: &str) -> String {
    // Escape YAML special characters in interpolated values
    let safe_db_path = database_path.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"database:
  path: "{db_path}"    # or {{ env: DATABASE_PATH }}

migrations_dir: migrations
changelog_table: changelog
"#,
        db_path = safe_db_path,
    )
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
