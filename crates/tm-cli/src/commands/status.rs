//! Status command implementation

use anyhow::{Context, Result};
use tm_core::StatusItem;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx.migrator.status_report().await?;

    match args.output {
        StatusOutput::Table => {
            print!("{}", render_table(&report.items));
            for entry in &report.orphaned {
                println!(
                    "warning: {} is recorded in the changelog but has no migration file",
                    entry.file_name
                );
            }
        }
        // Orphans are still logged by the migrator; stdout stays valid JSON
        StatusOutput::Json => {
            let json = serde_json::to_string_pretty(&report.items)
                .context("Failed to serialize status")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// `Filename | Applied At` table, one row per migration
fn render_table(items: &[StatusItem]) -> String {
    let rows: Vec<(String, String)> = items
        .iter()
        .map(|item| (item.file_name.to_string(), item.state.to_string()))
        .collect();
    let name_width = rows
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$} | Applied At\n",
        "Filename",
        name_width = name_width
    ));
    out.push_str(&format!(
        "{:-<name_width$}-+-{}\n",
        "",
        "-".repeat(25),
        name_width = name_width
    ));
    for (name, applied) in rows {
        out.push_str(&format!(
            "{:<name_width$} | {}\n",
            name,
            applied,
            name_width = name_width
        ));
    }
    out
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
