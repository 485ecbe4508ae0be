//! Down command implementation

use anyhow::Result;

use crate::cli::{DownArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the down command
pub(crate) async fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    match ctx.migrator.down(args.count).await {
        Ok(reverted) => {
            if reverted.is_empty() {
                println!("No applied migrations to revert");
            }
            for id in &reverted {
                println!("MIGRATED DOWN: {}", id);
            }
            Ok(())
        }
        Err(err) => {
            for id in &err.completed {
                println!("MIGRATED DOWN: {}", id);
            }
            Err(err.into())
        }
    }
}
