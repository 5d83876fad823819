//! Export command implementation.

use super::connect;
use crate::ConnectionArgs;
use anyhow::Result;
use spaceport::exporter::ExportReport;
use spaceport::{Config, ExportRequest, LocalStore, SpaceProgress};
use std::path::PathBuf;

pub struct ExportOptions {
    pub dir: PathBuf,
    pub spaces: Vec<String>,
    pub types: Vec<String>,
    pub include_references_deep: bool,
    pub dry_run: bool,
}

/// Run the export command.
pub async fn run_export(
    config: &Config,
    connection: &ConnectionArgs,
    options: ExportOptions,
) -> Result<()> {
    let client = connect(config, connection)?;
    let store = LocalStore::new(&options.dir);

    let request = ExportRequest {
        spaces: options.spaces,
        types: options.types,
        known_types: config.known_types(),
        include_references_deep: options.include_references_deep
            || config.export.include_references_deep,
        dry_run: options.dry_run,
    };

    let progress = SpaceProgress::new("Exported");
    let report = spaceport::run_export(&client, &request, &store, Some(&progress)).await?;

    if report.dry_run {
        print_selection(&report);
        return Ok(());
    }

    println!();
    println!("Export complete: {}", options.dir.display());
    for bundle in &report.exported {
        println!("  {:<24} {} ({} bytes)", bundle.space_id, bundle.file, bundle.bytes);
    }
    for failed in &report.failed {
        println!("  {:<24} FAILED: {}", failed.space_id, failed.error);
    }

    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} spaces failed to export; they are listed in the manifest without a bundle",
            report.failed.len(),
            report.selection.spaces.len()
        );
    }

    Ok(())
}

fn print_selection(report: &ExportReport) {
    println!("Dry run, nothing exported.");
    println!("Types: {}", report.selection.types);
    println!("Spaces:");
    for space in &report.selection.spaces {
        println!("  {:<24} {}", space.id, space.name);
    }
}
