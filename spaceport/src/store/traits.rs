use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::manifest::Manifest;

/// Storage for an export manifest and its object bundles.
///
/// Bundles are addressed by file name (`<space-id>.ndjson`), which is also the
/// value recorded under `_bundle` in the manifest.
#[async_trait]
pub trait BundleStore: Send + Sync {
    /// Make the store writable (create the directory, bucket prefix, ...).
    async fn prepare(&self) -> Result<()>;

    /// Persist a space's bundle unmodified and return its file name.
    async fn write_bundle(&self, space_id: &str, data: Bytes) -> Result<String>;

    /// Read a bundle back.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::BundleMissing` if the file does not exist.
    async fn read_bundle(&self, file: &str) -> Result<Bytes>;

    async fn bundle_exists(&self, file: &str) -> Result<bool>;

    /// File names of every bundle in the store, sorted.
    async fn list_bundles(&self) -> Result<Vec<String>>;

    async fn write_manifest(&self, manifest: &Manifest) -> Result<()>;

    /// Read the manifest, `None` if the store holds none.
    async fn read_manifest(&self) -> Result<Option<Manifest>>;

    /// Human-readable location, used in logs and error messages.
    fn location(&self) -> String;
}
