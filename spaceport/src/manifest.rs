//! Export manifest: the hand-off between an export run and an import run.
//!
//! Layout of an export directory:
//!
//! ```text
//! <export_dir>/spaces_details.json   manifest, JSON array of space records
//! <export_dir>/<space-id>.ndjson     one object bundle per exported space
//! ```
//!
//! Each manifest entry is the space record exactly as the source instance
//! returned it, plus a `_bundle` key when a bundle was written for it.

use crate::space::Space;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "spaces_details.json";
pub const BUNDLE_EXTENSION: &str = "ndjson";

/// File name of the bundle holding a space's saved objects.
pub fn bundle_file_name(space_id: &str) -> String {
    format!("{}.{}", space_id, BUNDLE_EXTENSION)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(flatten)]
    pub space: Space,
    /// Bundle written for this space; absent when the export failed.
    #[serde(rename = "_bundle", default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
}

impl ManifestEntry {
    pub fn new(space: Space, bundle: Option<String>) -> Self {
        Self { space, bundle }
    }

    pub fn id(&self) -> &str {
        &self.space.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, space_id: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.space.id == space_id)
    }

    /// Bundle file names referenced by the manifest, in entry order.
    pub fn bundle_files(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.bundle.as_deref())
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
