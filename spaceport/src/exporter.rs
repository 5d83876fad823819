//! Export side of a migration.
//!
//! One export request per selected space. A space that fails to export is
//! logged and skipped so the remaining spaces still make it to disk; the
//! manifest lists every selected space either way, so the import side can
//! still recreate the ones that came back empty-handed.

use crate::client::KibanaClient;
use crate::directory::list_spaces;
use crate::error::{MigrateError, Result};
use crate::manifest::{Manifest, ManifestEntry};
use crate::progress::RunProgress;
use crate::selector::{resolve, Selection, TypeFilter};
use crate::space::Space;
use crate::store::BundleStore;
use serde_json::json;
use tracing::{error, info, instrument};

const EXPORT_PATH: &str = "api/saved_objects/_export";

/// What to export.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// Space ids to export; empty exports every space.
    pub spaces: Vec<String>,
    /// Object types to export; empty exports every type.
    pub types: Vec<String>,
    /// Types `types` is validated against.
    pub known_types: Vec<String>,
    pub include_references_deep: bool,
    /// Resolve and report the selection without exporting or writing anything.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedBundle {
    pub space_id: String,
    pub file: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedExport {
    pub space_id: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub selection: Selection,
    pub exported: Vec<ExportedBundle>,
    pub failed: Vec<FailedExport>,
    pub dry_run: bool,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Export one space's objects into the store.
#[instrument(skip_all, fields(space = %space.id, types = %types))]
pub async fn export_space(
    client: &KibanaClient,
    space: &Space,
    types: &TypeFilter,
    include_references_deep: bool,
    store: &dyn BundleStore,
) -> Result<ExportedBundle> {
    let mut body = json!({ "type": types });
    if include_references_deep {
        body["includeReferencesDeep"] = json!(true);
    }

    let url = client.space_url(&space.id, EXPORT_PATH)?;
    let response = client.post(url).json(&body).send().await?;
    let response =
        KibanaClient::check(response, &format!("Exporting space '{}'", space.id)).await?;
    let data = response.bytes().await?;

    let bytes = data.len();
    let file = store.write_bundle(&space.id, data).await?;
    info!("Exported space {} to {} ({} bytes)", space.id, file, bytes);

    Ok(ExportedBundle {
        space_id: space.id.clone(),
        file,
        bytes,
    })
}

/// Run a full export: select spaces, export each one, write the manifest.
///
/// Validation errors abort before any export request. Per-space failures do
/// not; they are collected in the report.
pub async fn run_export(
    client: &KibanaClient,
    request: &ExportRequest,
    store: &dyn BundleStore,
    progress: Option<&dyn RunProgress>,
) -> Result<ExportReport> {
    let all_spaces = list_spaces(client).await?;
    let selection = resolve(
        &all_spaces,
        &request.spaces,
        &request.types,
        &request.known_types,
    )?;

    info!(
        "Selected {} of {} spaces ({})",
        selection.spaces.len(),
        all_spaces.len(),
        selection.types
    );

    let mut report = ExportReport {
        selection,
        exported: Vec::new(),
        failed: Vec::new(),
        dry_run: request.dry_run,
    };

    if request.dry_run {
        return Ok(report);
    }

    store.prepare().await?;

    if let Some(p) = progress {
        p.on_start(report.selection.spaces.len() as u64);
    }

    let mut entries = Vec::with_capacity(report.selection.spaces.len());
    for space in &report.selection.spaces {
        match export_space(
            client,
            space,
            &report.selection.types,
            request.include_references_deep,
            store,
        )
        .await
        {
            Ok(bundle) => {
                entries.push(ManifestEntry::new(space.clone(), Some(bundle.file.clone())));
                report.exported.push(bundle);
                if let Some(p) = progress {
                    p.on_space_done(&space.id);
                }
            }
            Err(e) => {
                log_export_failure(&space.id, &e);
                entries.push(ManifestEntry::new(space.clone(), None));
                report.failed.push(FailedExport {
                    space_id: space.id.clone(),
                    error: e.to_string(),
                });
                if let Some(p) = progress {
                    p.on_space_failed(&space.id);
                }
            }
        }
    }

    store.write_manifest(&Manifest::new(entries)).await?;
    info!(
        "Wrote manifest for {} spaces to {}",
        report.selection.spaces.len(),
        store.location()
    );

    if let Some(p) = progress {
        p.on_finish();
    }

    Ok(report)
}

fn log_export_failure(space_id: &str, err: &MigrateError) {
    match err {
        MigrateError::Transport { status, body, .. } => {
            error!(space = %space_id, status = *status, body = %body, "Export failed, continuing with next space");
        }
        other => {
            error!(space = %space_id, error = %other, "Export failed, continuing with next space");
        }
    }
}
