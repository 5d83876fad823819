//! Directory-backed bundle store.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

use super::traits::BundleStore;
use crate::error::{MigrateError, Result};
use crate::manifest::{bundle_file_name, Manifest, BUNDLE_EXTENSION, MANIFEST_FILE};

/// Keeps `spaces_details.json` and `<space-id>.ndjson` files in one directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn bundle_path(&self, file: &str) -> Result<PathBuf> {
        // Manifests may come from elsewhere; never let a name escape the directory.
        if file.is_empty() || file.contains(['/', '\\']) || file.starts_with('.') {
            return Err(MigrateError::Other(format!("Invalid bundle file name '{}'", file)));
        }
        Ok(self.dir.join(file))
    }
}

#[async_trait]
impl BundleStore for LocalStore {
    async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    #[instrument(skip(self, data), fields(dir = %self.dir.display(), size = data.len()))]
    async fn write_bundle(&self, space_id: &str, data: Bytes) -> Result<String> {
        let file = bundle_file_name(space_id);
        let path = self.bundle_path(&file)?;
        debug!("Writing {} bytes to {:?}", data.len(), path);
        fs::write(&path, &data).await?;
        Ok(file)
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn read_bundle(&self, file: &str) -> Result<Bytes> {
        let path = self.bundle_path(file)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MigrateError::BundleMissing(vec![file.to_string()]))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn bundle_exists(&self, file: &str) -> Result<bool> {
        let path = self.bundle_path(file)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn list_bundles(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.metadata().await?.is_file() {
                continue;
            }
            if path.extension().is_some_and(|e| e == BUNDLE_EXTENSION) {
                if let Some(name) = path.file_name() {
                    files.push(name.to_string_lossy().to_string());
                }
            }
        }

        files.sort();
        Ok(files)
    }

    async fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        let path = self.manifest_path();
        debug!("Writing manifest with {} spaces to {:?}", manifest.len(), path);
        fs::write(&path, manifest.to_json()?).await?;
        Ok(())
    }

    async fn read_manifest(&self) -> Result<Option<Manifest>> {
        match fs::read(self.manifest_path()).await {
            Ok(data) => Ok(Some(Manifest::from_json(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
