//! Import side of a migration.
//!
//! Spaces are replayed strictly one after the other: provision the space,
//! then upload its bundle. The first failure stops the run, and the error
//! names the spaces that already went through, so the operator knows exactly
//! which part of the destination is up to date.

use crate::client::KibanaClient;
use crate::confirm::Confirm;
use crate::error::{MigrateError, Result, CONFLICT_GUIDANCE};
use crate::manifest::{bundle_file_name, ManifestEntry};
use crate::mode::ConflictMode;
use crate::progress::RunProgress;
use crate::provisioner::{ensure_space, Provisioned};
use crate::space::Space;
use crate::store::BundleStore;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

const IMPORT_PATH: &str = "api/saved_objects/_import";
const NDJSON_MIME: &str = "application/ndjson";

/// Spaces an import run will process, read from an export manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub location: String,
    pub entries: Vec<ManifestEntry>,
    /// Bundle files present in the store that no manifest entry refers to.
    pub orphans: Vec<String>,
}

/// Result of uploading one bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    pub success_count: u64,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpaceImport {
    pub space_id: String,
    pub provisioned: Provisioned,
    /// `None` when there was nothing to upload.
    pub result: Option<ImportResult>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub spaces: Vec<SpaceImport>,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.spaces
            .iter()
            .filter(|s| s.provisioned == Provisioned::Created)
            .count()
    }

    pub fn objects_imported(&self) -> u64 {
        self.spaces
            .iter()
            .filter_map(|s| s.result.as_ref())
            .map(|r| r.success_count)
            .sum()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    success_count: u64,
    #[serde(default)]
    errors: Vec<ImportObjectError>,
    #[serde(default)]
    warnings: Vec<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ImportObjectError {
    #[serde(default)]
    error: Option<ImportErrorKind>,
}

#[derive(Debug, Deserialize)]
struct ImportErrorKind {
    #[serde(rename = "type")]
    kind: String,
}

impl ImportResponse {
    fn has_conflicts(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.error.as_ref().is_some_and(|k| k.kind == "conflict"))
    }
}

fn mentions_conflict(body: &str) -> bool {
    body.to_ascii_lowercase().contains("conflict")
}

/// Read the manifest and check it against the store.
///
/// Fails when the manifest is missing, when an entry points at a bundle the
/// store does not have (all such entries are listed), or when `space_filter`
/// names spaces the manifest does not contain.
pub async fn plan_import(store: &dyn BundleStore, space_filter: &[String]) -> Result<ImportPlan> {
    let manifest = store
        .read_manifest()
        .await?
        .ok_or_else(|| MigrateError::ManifestMissing(store.location()))?;

    let unknown_spaces: Vec<String> = space_filter
        .iter()
        .filter(|id| manifest.get(id).is_none())
        .cloned()
        .collect();
    let invalid_ids: Vec<String> = manifest
        .entries
        .iter()
        .map(|e| e.space.id.clone())
        .filter(|id| !Space::is_valid_id(id))
        .collect();
    if !unknown_spaces.is_empty() || !invalid_ids.is_empty() {
        return Err(MigrateError::Validation {
            unknown_spaces,
            unknown_types: Vec::new(),
            invalid_ids,
        });
    }

    let mut missing = Vec::new();
    for file in manifest.bundle_files() {
        if !store.bundle_exists(file).await? {
            missing.push(file.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(MigrateError::BundleMissing(missing));
    }

    let referenced: Vec<&str> = manifest.bundle_files().collect();
    let orphans: Vec<String> = store
        .list_bundles()
        .await?
        .into_iter()
        .filter(|f| !referenced.contains(&f.as_str()))
        .collect();
    for orphan in &orphans {
        warn!("Bundle {} is not listed in the manifest and will be ignored", orphan);
    }

    let entries = manifest
        .entries
        .into_iter()
        .filter(|e| space_filter.is_empty() || space_filter.contains(&e.space.id))
        .collect();

    Ok(ImportPlan {
        location: store.location(),
        entries,
        orphans,
    })
}

/// Upload one bundle into a space.
#[instrument(skip_all, fields(space = %space.id, mode = %mode))]
pub async fn import_space(
    client: &KibanaClient,
    bundle: Bytes,
    space: &Space,
    mode: ConflictMode,
) -> Result<ImportResult> {
    let url = client.space_url(&space.id, IMPORT_PATH)?;
    let part = Part::bytes(bundle.to_vec())
        .file_name(bundle_file_name(&space.id))
        .mime_str(NDJSON_MIME)?;
    let form = Form::new().part("file", part);

    let response = client
        .post(url)
        .query(&mode.query_params())
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if mentions_conflict(&body) {
            return Err(MigrateError::Conflict {
                space: space.id.clone(),
                body,
            });
        }
        return Err(MigrateError::transport(
            format!("Importing into space '{}'", space.id),
            status,
            body,
        ));
    }

    let body = response.text().await?;
    let parsed: ImportResponse = serde_json::from_str(&body)?;
    if !parsed.success {
        if parsed.has_conflicts() || mentions_conflict(&body) {
            return Err(MigrateError::Conflict {
                space: space.id.clone(),
                body,
            });
        }
        return Err(MigrateError::ImportRejected {
            space: space.id.clone(),
            body,
        });
    }

    info!(
        "Imported {} objects into space {}",
        parsed.success_count, space.id
    );
    Ok(ImportResult {
        success_count: parsed.success_count,
        warnings: parsed.warnings.len(),
    })
}

/// Run a full import after the operator has confirmed the plan.
///
/// Declining returns `MigrateError::Declined` before any request is sent.
pub async fn run_import(
    client: &KibanaClient,
    plan: &ImportPlan,
    mode: ConflictMode,
    store: &dyn BundleStore,
    confirm: &dyn Confirm,
    progress: Option<&dyn RunProgress>,
) -> Result<ImportReport> {
    if !confirm.confirm(plan, mode)? {
        info!("Import declined, nothing was sent");
        return Err(MigrateError::Declined);
    }

    if let Some(p) = progress {
        p.on_start(plan.entries.len() as u64);
    }

    let mut report = ImportReport::default();
    for entry in &plan.entries {
        match import_entry(client, entry, mode, store).await {
            Ok(done) => {
                if let Some(p) = progress {
                    p.on_space_done(&done.space_id);
                }
                report.spaces.push(done);
            }
            Err(e) => {
                log_import_failure(entry.id(), &e);
                if let Some(p) = progress {
                    p.on_space_failed(entry.id());
                    p.on_finish();
                }
                return Err(MigrateError::ImportAborted {
                    space: entry.id().to_string(),
                    completed: report.spaces.iter().map(|s| s.space_id.clone()).collect(),
                    source: Box::new(e),
                });
            }
        }
    }

    if let Some(p) = progress {
        p.on_finish();
    }

    Ok(report)
}

async fn import_entry(
    client: &KibanaClient,
    entry: &ManifestEntry,
    mode: ConflictMode,
    store: &dyn BundleStore,
) -> Result<SpaceImport> {
    let provisioned = ensure_space(client, &entry.space).await?;

    let result = match &entry.bundle {
        Some(file) => {
            let bundle = store.read_bundle(file).await?;
            if bundle.iter().all(u8::is_ascii_whitespace) {
                info!("Bundle {} is empty, nothing to import", file);
                None
            } else {
                Some(import_space(client, bundle, &entry.space, mode).await?)
            }
        }
        None => {
            info!("Space {} has no bundle, created space only", entry.id());
            None
        }
    };

    Ok(SpaceImport {
        space_id: entry.id().to_string(),
        provisioned,
        result,
    })
}

fn log_import_failure(space_id: &str, err: &MigrateError) {
    match err {
        MigrateError::Conflict { body, .. } => {
            error!(space = %space_id, body = %body, "Import hit conflicts; {}", CONFLICT_GUIDANCE);
        }
        MigrateError::Transport { status, body, .. } => {
            error!(space = %space_id, status = *status, body = %body, "Import failed, aborting run");
        }
        other => {
            error!(space = %space_id, error = %other, "Import failed, aborting run");
        }
    }
}
