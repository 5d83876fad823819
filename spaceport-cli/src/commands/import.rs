//! Import command implementation.

use super::connect;
use crate::prompt::TerminalConfirm;
use crate::ConnectionArgs;
use anyhow::Result;
use spaceport::error::CONFLICT_GUIDANCE;
use spaceport::{
    plan_import, AutoConfirm, Config, Confirm, ConflictMode, LocalStore, MigrateError,
    SpaceProgress,
};
use std::path::Path;

/// Run the import command.
pub async fn run_import(
    config: &Config,
    connection: &ConnectionArgs,
    dir: &Path,
    spaces: &[String],
    mode: ConflictMode,
    yes: bool,
) -> Result<()> {
    // Manifest problems surface before the password prompt.
    let store = LocalStore::new(dir);
    let plan = plan_import(&store, spaces).await?;
    if !plan.orphans.is_empty() {
        println!("Ignoring bundles not in the manifest: {}", plan.orphans.join(", "));
    }

    let client = connect(config, connection)?;

    let confirm: Box<dyn Confirm> = if yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(TerminalConfirm)
    };

    let progress = SpaceProgress::new("Imported");
    let result = spaceport::run_import(
        &client,
        &plan,
        mode,
        &store,
        confirm.as_ref(),
        Some(&progress),
    )
    .await;

    match result {
        Ok(report) => {
            println!();
            println!("Import completed:");
            println!("  Spaces:        {}", report.spaces.len());
            println!("  Spaces created: {}", report.created());
            println!("  Objects:       {}", report.objects_imported());
            Ok(())
        }
        Err(MigrateError::Declined) => {
            println!("Import cancelled; nothing was sent.");
            Ok(())
        }
        Err(e) => {
            let completed = e.completed_spaces();
            eprintln!();
            if completed.is_empty() {
                eprintln!("No spaces were imported.");
            } else {
                eprintln!("Spaces imported before the failure: {}", completed.join(", "));
            }
            if e.is_conflict() {
                eprintln!("Hint: {}", CONFLICT_GUIDANCE);
            }
            Err(e.into())
        }
    }
}
