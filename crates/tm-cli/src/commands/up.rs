//! Up command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the up command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    match ctx.migrator.up().await {
        Ok(migrated) => {
            if migrated.is_empty() {
                println!("No pending migrations");
            }
            for id in &migrated {
                println!("MIGRATED UP: {}", id);
            }
            Ok(())
        }
        Err(err) => {
            for id in &err.completed {
                println!("MIGRATED UP: {}", id);
            }
            eprintln!(
                "Stopped after {} migration(s); later migrations were not attempted",
                err.completed.len()
            );
            Err(err.into())
        }
    }
}
