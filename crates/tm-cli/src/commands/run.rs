//! Run command implementation - single run of an idempotent migration

use anyhow::Result;
use tm_core::MigrationId;
use tm_migrate::dir_catalog::MIGRATION_EXTENSION;

use crate::cli::{GlobalArgs, RunArgs};
use crate::context::RuntimeContext;

/// Execute the run command
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let id = parse_identifier(&args.identifier)?;
    let ctx = RuntimeContext::new(global)?;

    let entry = ctx.migrator.run(&id).await?;
    println!("MIGRATED UP: {}", entry.file_name);
    Ok(())
}

/// Accept either the identifier or the file name
fn parse_identifier(raw: &str) -> Result<MigrationId> {
    let suffix = format!(".{}", MIGRATION_EXTENSION);
    let stem = raw.strip_suffix(suffix.as_str()).unwrap_or(raw);
    Ok(MigrationId::try_new(stem)?)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
